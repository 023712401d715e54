//! Nodes with ordered lists of children: function invocation, lambda
//! application and instance construction.

use std::collections::HashSet;
use std::sync::Arc;

use super::{Expression, RelatedEntityRef, VariableReferenceExpression};
use crate::error::{ConstructionError, Result};
use crate::metadata::{EdmFunction, TypeOracle, TypeUsageRef};

/// Invocation of a model or store function.
#[derive(Debug, Clone)]
pub struct FunctionExpression {
    result_type: TypeUsageRef,
    function: Arc<EdmFunction>,
    arguments: Vec<Expression>,
}

impl FunctionExpression {
    /// `result_type` must be the very handle the function declares as its
    /// return type, and there must be one argument per declared parameter.
    pub fn new(
        result_type: TypeUsageRef,
        function: Arc<EdmFunction>,
        arguments: Vec<Expression>,
    ) -> Result<Self> {
        let Some(return_type) = function.return_type() else {
            return Err(ConstructionError::UnexpectedType {
                argument: "function",
                expected: "a function with a declared return type",
                found: function.full_name(),
            });
        };
        if !Arc::ptr_eq(&result_type, return_type) {
            return Err(ConstructionError::ResultTypeMismatch {
                argument: "result_type",
                expected: return_type.to_string(),
                found: result_type.to_string(),
            });
        }
        if arguments.len() != function.parameters().len() {
            return Err(ConstructionError::ArgumentCountMismatch {
                argument: "arguments",
                expected: function.parameters().len(),
                found: arguments.len(),
            });
        }
        Ok(Self {
            result_type,
            function,
            arguments,
        })
    }

    pub fn result_type(&self) -> &TypeUsageRef {
        &self.result_type
    }

    pub fn function(&self) -> &Arc<EdmFunction> {
        &self.function
    }

    pub fn arguments(&self) -> &[Expression] {
        &self.arguments
    }
}

/// Parameter bindings plus a body; applied by a [`LambdaExpression`].
#[derive(Debug, Clone)]
pub struct Lambda {
    variables: Vec<VariableReferenceExpression>,
    body: Box<Expression>,
}

impl Lambda {
    pub fn new(variables: Vec<VariableReferenceExpression>, body: Expression) -> Result<Self> {
        let mut seen = HashSet::new();
        for variable in &variables {
            if !seen.insert(variable.variable_name()) {
                return Err(ConstructionError::DuplicateVariable {
                    name: variable.variable_name().into(),
                });
            }
        }
        Ok(Self {
            variables,
            body: Box::new(body),
        })
    }

    pub fn variables(&self) -> &[VariableReferenceExpression] {
        &self.variables
    }

    pub fn body(&self) -> &Expression {
        &self.body
    }
}

/// Application of a lambda to an argument list.
#[derive(Debug, Clone)]
pub struct LambdaExpression {
    result_type: TypeUsageRef,
    lambda: Lambda,
    arguments: Vec<Expression>,
}

impl LambdaExpression {
    pub fn new(result_type: TypeUsageRef, lambda: Lambda, arguments: Vec<Expression>) -> Result<Self> {
        let body_type = lambda.body().result_type();
        if !Arc::ptr_eq(&result_type, body_type) {
            return Err(ConstructionError::ResultTypeMismatch {
                argument: "result_type",
                expected: body_type.to_string(),
                found: result_type.to_string(),
            });
        }
        if arguments.len() != lambda.variables().len() {
            return Err(ConstructionError::ArgumentCountMismatch {
                argument: "arguments",
                expected: lambda.variables().len(),
                found: arguments.len(),
            });
        }
        Ok(Self {
            result_type,
            lambda,
            arguments,
        })
    }

    pub fn result_type(&self) -> &TypeUsageRef {
        &self.result_type
    }

    pub fn lambda(&self) -> &Lambda {
        &self.lambda
    }

    pub fn arguments(&self) -> &[Expression] {
        &self.arguments
    }
}

/// Construction of a record, collection, or entity instance.
#[derive(Debug, Clone)]
pub struct NewInstanceExpression {
    result_type: TypeUsageRef,
    elements: Vec<Expression>,
    // `None` rather than an empty list, so presence is a fast-path check.
    related_entity_refs: Option<Vec<RelatedEntityRef>>,
}

impl NewInstanceExpression {
    /// Fails for an empty element list unless `result_type` is a collection.
    pub fn new(
        oracle: &dyn TypeOracle,
        result_type: TypeUsageRef,
        elements: Vec<Expression>,
    ) -> Result<Self> {
        if elements.is_empty() && !oracle.is_collection(&result_type) {
            return Err(ConstructionError::EmptyElements {
                type_name: result_type.to_string(),
            });
        }
        Ok(Self {
            result_type,
            elements,
            related_entity_refs: None,
        })
    }

    /// Entity construction that also wires up to-one relationships.
    pub fn with_related_entity_refs(
        oracle: &dyn TypeOracle,
        result_type: TypeUsageRef,
        elements: Vec<Expression>,
        related_entity_refs: Vec<RelatedEntityRef>,
    ) -> Result<Self> {
        if !oracle.is_entity(&result_type) {
            return Err(ConstructionError::UnexpectedType {
                argument: "result_type",
                expected: "an entity type",
                found: result_type.to_string(),
            });
        }
        let mut instance = Self::new(oracle, result_type, elements)?;
        if !related_entity_refs.is_empty() {
            instance.related_entity_refs = Some(related_entity_refs);
        }
        Ok(instance)
    }

    pub fn result_type(&self) -> &TypeUsageRef {
        &self.result_type
    }

    pub fn arguments(&self) -> &[Expression] {
        &self.elements
    }

    pub fn has_related_entity_refs(&self) -> bool {
        self.related_entity_refs.is_some()
    }

    pub fn related_entity_refs(&self) -> Option<&[RelatedEntityRef]> {
        self.related_entity_refs.as_deref()
    }
}
