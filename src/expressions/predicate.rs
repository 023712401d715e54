//! Boolean-valued nodes: comparisons, logical connectives and null tests.

use std::fmt;

use super::{Expression, ExpressionKind};
use crate::error::{ConstructionError, Result};
use crate::metadata::{PrimitiveTypeKind, TypeOracle, TypeUsage, TypeUsageRef};

fn boolean_type() -> TypeUsageRef {
    TypeUsage::primitive(PrimitiveTypeKind::Boolean)
}

fn require_boolean(oracle: &dyn TypeOracle, argument: &'static str, operand: &Expression) -> Result<()> {
    if oracle.is_boolean(operand.result_type()) {
        Ok(())
    } else {
        Err(ConstructionError::UnexpectedType {
            argument,
            expected: "a Boolean type",
            found: operand.result_type().to_string(),
        })
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    Equals,
    NotEquals,
    LessThan,
    LessThanOrEquals,
    GreaterThan,
    GreaterThanOrEquals,
}

impl ComparisonOperator {
    pub fn kind(self) -> ExpressionKind {
        match self {
            Self::Equals => ExpressionKind::Equals,
            Self::NotEquals => ExpressionKind::NotEquals,
            Self::LessThan => ExpressionKind::LessThan,
            Self::LessThanOrEquals => ExpressionKind::LessThanOrEquals,
            Self::GreaterThan => ExpressionKind::GreaterThan,
            Self::GreaterThanOrEquals => ExpressionKind::GreaterThanOrEquals,
        }
    }

    /// Equality operators also accept entity and reference operands.
    pub fn is_equality(self) -> bool {
        matches!(self, Self::Equals | Self::NotEquals)
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::Equals => "=",
            Self::NotEquals => "<>",
            Self::LessThan => "<",
            Self::LessThanOrEquals => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEquals => ">=",
        };
        f.write_str(symbol)
    }
}

#[derive(Debug, Clone)]
pub struct ComparisonExpression {
    result_type: TypeUsageRef,
    operator: ComparisonOperator,
    left: Box<Expression>,
    right: Box<Expression>,
}

impl ComparisonExpression {
    pub fn new(
        oracle: &dyn TypeOracle,
        operator: ComparisonOperator,
        left: Expression,
        right: Expression,
    ) -> Result<Self> {
        let (lt, rt) = (left.result_type(), right.result_type());
        let comparable = if oracle.is_scalar(lt) && oracle.is_scalar(rt) {
            !oracle.is_primitive(lt, PrimitiveTypeKind::Binary) || operator.is_equality()
        } else {
            operator.is_equality()
                && ((oracle.is_entity(lt) && oracle.is_entity(rt))
                    || (oracle.is_reference(lt) && oracle.is_reference(rt)))
        };
        let promotable =
            oracle.is_equal_or_promotable(lt, rt) || oracle.is_equal_or_promotable(rt, lt);
        if !comparable || !promotable {
            return Err(ConstructionError::IncompatibleTypes {
                argument: "right",
                left: lt.to_string(),
                right: rt.to_string(),
            });
        }
        Ok(Self {
            result_type: boolean_type(),
            operator,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn result_type(&self) -> &TypeUsageRef {
        &self.result_type
    }

    pub fn operator(&self) -> ComparisonOperator {
        self.operator
    }

    pub fn left(&self) -> &Expression {
        &self.left
    }

    pub fn right(&self) -> &Expression {
        &self.right
    }
}

#[derive(Debug, Clone)]
pub struct AndExpression {
    result_type: TypeUsageRef,
    left: Box<Expression>,
    right: Box<Expression>,
}

impl AndExpression {
    pub fn new(oracle: &dyn TypeOracle, left: Expression, right: Expression) -> Result<Self> {
        require_boolean(oracle, "left", &left)?;
        require_boolean(oracle, "right", &right)?;
        Ok(Self {
            result_type: boolean_type(),
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn result_type(&self) -> &TypeUsageRef {
        &self.result_type
    }

    pub fn left(&self) -> &Expression {
        &self.left
    }

    pub fn right(&self) -> &Expression {
        &self.right
    }
}

#[derive(Debug, Clone)]
pub struct OrExpression {
    result_type: TypeUsageRef,
    left: Box<Expression>,
    right: Box<Expression>,
}

impl OrExpression {
    pub fn new(oracle: &dyn TypeOracle, left: Expression, right: Expression) -> Result<Self> {
        require_boolean(oracle, "left", &left)?;
        require_boolean(oracle, "right", &right)?;
        Ok(Self {
            result_type: boolean_type(),
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn result_type(&self) -> &TypeUsageRef {
        &self.result_type
    }

    pub fn left(&self) -> &Expression {
        &self.left
    }

    pub fn right(&self) -> &Expression {
        &self.right
    }
}

#[derive(Debug, Clone)]
pub struct NotExpression {
    result_type: TypeUsageRef,
    argument: Box<Expression>,
}

impl NotExpression {
    pub fn new(oracle: &dyn TypeOracle, argument: Expression) -> Result<Self> {
        require_boolean(oracle, "argument", &argument)?;
        Ok(Self {
            result_type: boolean_type(),
            argument: Box::new(argument),
        })
    }

    pub fn result_type(&self) -> &TypeUsageRef {
        &self.result_type
    }

    pub fn argument(&self) -> &Expression {
        &self.argument
    }
}

/// Null test over a single non-collection operand.
#[derive(Debug, Clone)]
pub struct IsNullExpression {
    result_type: TypeUsageRef,
    argument: Box<Expression>,
}

impl IsNullExpression {
    pub fn new(oracle: &dyn TypeOracle, argument: Expression) -> Result<Self> {
        if oracle.is_collection(argument.result_type()) {
            return Err(ConstructionError::UnexpectedType {
                argument: "argument",
                expected: "a non-collection type",
                found: argument.result_type().to_string(),
            });
        }
        Ok(Self {
            result_type: boolean_type(),
            argument: Box::new(argument),
        })
    }

    pub fn result_type(&self) -> &TypeUsageRef {
        &self.result_type
    }

    pub fn argument(&self) -> &Expression {
        &self.argument
    }
}
