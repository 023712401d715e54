//! Set-valued nodes that bind an input collection to a variable.

use smol_str::SmolStr;

use super::{Expression, VariableReferenceExpression};
use crate::error::{ConstructionError, Result};
use crate::metadata::{TypeOracle, TypeUsage, TypeUsageRef};

/// Binds each element of a collection-valued expression to a variable.
#[derive(Debug, Clone)]
pub struct ExpressionBinding {
    expression: Box<Expression>,
    variable: VariableReferenceExpression,
}

impl ExpressionBinding {
    pub fn new(
        oracle: &dyn TypeOracle,
        expression: Expression,
        variable_name: impl Into<SmolStr>,
    ) -> Result<Self> {
        let Some(element_type) = oracle.collection_element_type(expression.result_type()) else {
            return Err(ConstructionError::UnexpectedType {
                argument: "expression",
                expected: "a collection type",
                found: expression.result_type().to_string(),
            });
        };
        let variable = VariableReferenceExpression::new(element_type, variable_name)?;
        Ok(Self {
            expression: Box::new(expression),
            variable,
        })
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    pub fn variable(&self) -> &VariableReferenceExpression {
        &self.variable
    }

    pub fn variable_name(&self) -> &str {
        self.variable.variable_name()
    }

    pub fn variable_type(&self) -> &TypeUsageRef {
        self.variable.result_type()
    }
}

/// Elements of the input that satisfy a Boolean predicate.
#[derive(Debug, Clone)]
pub struct FilterExpression {
    result_type: TypeUsageRef,
    input: ExpressionBinding,
    predicate: Box<Expression>,
}

impl FilterExpression {
    pub fn new(oracle: &dyn TypeOracle, input: ExpressionBinding, predicate: Expression) -> Result<Self> {
        if !oracle.is_boolean(predicate.result_type()) {
            return Err(ConstructionError::UnexpectedType {
                argument: "predicate",
                expected: "a Boolean type",
                found: predicate.result_type().to_string(),
            });
        }
        Ok(Self {
            result_type: input.expression().result_type().clone(),
            input,
            predicate: Box::new(predicate),
        })
    }

    pub fn result_type(&self) -> &TypeUsageRef {
        &self.result_type
    }

    pub fn input(&self) -> &ExpressionBinding {
        &self.input
    }

    pub fn predicate(&self) -> &Expression {
        &self.predicate
    }
}

/// Projection of each input element through an expression.
#[derive(Debug, Clone)]
pub struct ProjectExpression {
    result_type: TypeUsageRef,
    input: ExpressionBinding,
    projection: Box<Expression>,
}

impl ProjectExpression {
    pub fn new(input: ExpressionBinding, projection: Expression) -> Self {
        Self {
            result_type: TypeUsage::collection(projection.result_type().clone()),
            input,
            projection: Box::new(projection),
        }
    }

    pub fn result_type(&self) -> &TypeUsageRef {
        &self.result_type
    }

    pub fn input(&self) -> &ExpressionBinding {
        &self.input
    }

    pub fn projection(&self) -> &Expression {
        &self.projection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{EdmTypeSemantics, PrimitiveTypeKind};

    fn var(ty: TypeUsageRef, name: &str) -> Expression {
        VariableReferenceExpression::new(ty, name).expect("valid variable").into()
    }

    fn ints() -> TypeUsageRef {
        TypeUsage::collection(TypeUsage::primitive(PrimitiveTypeKind::Int32))
    }

    #[test]
    fn binding_variable_takes_the_element_type() {
        let binding = ExpressionBinding::new(&EdmTypeSemantics, var(ints(), "xs"), "x").expect("collection input");
        assert_eq!(binding.variable_name(), "x");
        assert_eq!(binding.variable_type().to_string(), "Edm.Int32");

        let scalar = var(TypeUsage::primitive(PrimitiveTypeKind::Int32), "n");
        let err = ExpressionBinding::new(&EdmTypeSemantics, scalar, "x").unwrap_err();
        assert_eq!(err.argument(), Some("expression"));
    }

    #[test]
    fn filter_keeps_the_input_type() {
        let oracle = EdmTypeSemantics;
        let input = || ExpressionBinding::new(&oracle, var(ints(), "xs"), "x").expect("collection input");
        let flag = var(TypeUsage::primitive(PrimitiveTypeKind::Boolean), "flag");

        let filter = FilterExpression::new(&oracle, input(), flag).expect("Boolean predicate");
        assert!(oracle.edm_equals(filter.result_type().edm_type(), ints().edm_type()));

        let err = FilterExpression::new(&oracle, input(), var(TypeUsage::primitive(PrimitiveTypeKind::Int32), "n"))
            .unwrap_err();
        assert_eq!(err.argument(), Some("predicate"));
    }

    #[test]
    fn project_wraps_the_projection_type() {
        let input = ExpressionBinding::new(&EdmTypeSemantics, var(ints(), "xs"), "x").expect("collection input");
        let projection = var(TypeUsage::primitive(PrimitiveTypeKind::String), "s");

        let project = ProjectExpression::new(input, projection);
        assert_eq!(project.result_type().to_string(), "Collection(Edm.String)");
    }
}
