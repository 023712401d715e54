//! Expression nodes of a command tree.
//!
//! This module defines the closed set of node kinds:
//! - Leaves: constants, nulls, variable and parameter references, scans
//! - Single-child nodes: property access, relationship navigation, ref, deref
//! - Composite nodes: function invocation, lambda application, new instance
//! - Predicates and relational nodes: comparisons, logical connectives,
//!   null tests, filter and project
//!
//! Every node is produced by a fallible constructor that checks the node's
//! invariants against its already-built children. Once built, a node exposes
//! no mutators; children are owned exclusively by their parent.

mod composite;
mod constant;
mod kind;
mod navigation;
mod predicate;
mod reference;
mod related;
mod relational;

pub use composite::{FunctionExpression, Lambda, LambdaExpression, NewInstanceExpression};
pub use constant::{BinaryValue, ConstantExpression, ConstantValue, DecimalValue, NullExpression};
pub use kind::ExpressionKind;
pub use navigation::{
    DerefExpression, PropertyExpression, RefExpression, RelationshipNavigationExpression,
    ScanExpression,
};
pub use predicate::{
    AndExpression, ComparisonExpression, ComparisonOperator, IsNullExpression, NotExpression,
    OrExpression,
};
pub use reference::{ParameterReferenceExpression, VariableReferenceExpression};
pub use related::RelatedEntityRef;
pub use relational::{ExpressionBinding, FilterExpression, ProjectExpression};

use crate::metadata::TypeUsageRef;

// ============================================================================
// Expression - Top-level node type
// ============================================================================

/// Any node of a command tree.
#[derive(Debug, Clone)]
pub enum Expression {
    Constant(ConstantExpression),
    Null(NullExpression),
    VariableReference(VariableReferenceExpression),
    ParameterReference(ParameterReferenceExpression),
    Property(PropertyExpression),
    Function(FunctionExpression),
    Lambda(LambdaExpression),
    RelationshipNavigation(RelationshipNavigationExpression),
    NewInstance(NewInstanceExpression),
    Ref(RefExpression),
    Deref(DerefExpression),
    Scan(ScanExpression),
    Comparison(ComparisonExpression),
    And(AndExpression),
    Or(OrExpression),
    Not(NotExpression),
    IsNull(IsNullExpression),
    Filter(FilterExpression),
    Project(ProjectExpression),
}

impl Expression {
    /// Returns the kind tag of this node.
    pub fn kind(&self) -> ExpressionKind {
        match self {
            Expression::Constant(_) => ExpressionKind::Constant,
            Expression::Null(_) => ExpressionKind::Null,
            Expression::VariableReference(_) => ExpressionKind::VariableReference,
            Expression::ParameterReference(_) => ExpressionKind::ParameterReference,
            Expression::Property(_) => ExpressionKind::Property,
            Expression::Function(_) => ExpressionKind::Function,
            Expression::Lambda(_) => ExpressionKind::Lambda,
            Expression::RelationshipNavigation(_) => ExpressionKind::RelationshipNavigation,
            Expression::NewInstance(_) => ExpressionKind::NewInstance,
            Expression::Ref(_) => ExpressionKind::Ref,
            Expression::Deref(_) => ExpressionKind::Deref,
            Expression::Scan(_) => ExpressionKind::Scan,
            Expression::Comparison(e) => e.operator().kind(),
            Expression::And(_) => ExpressionKind::And,
            Expression::Or(_) => ExpressionKind::Or,
            Expression::Not(_) => ExpressionKind::Not,
            Expression::IsNull(_) => ExpressionKind::IsNull,
            Expression::Filter(_) => ExpressionKind::Filter,
            Expression::Project(_) => ExpressionKind::Project,
        }
    }

    /// Returns the result type of this node.
    pub fn result_type(&self) -> &TypeUsageRef {
        match self {
            Expression::Constant(e) => e.result_type(),
            Expression::Null(e) => e.result_type(),
            Expression::VariableReference(e) => e.result_type(),
            Expression::ParameterReference(e) => e.result_type(),
            Expression::Property(e) => e.result_type(),
            Expression::Function(e) => e.result_type(),
            Expression::Lambda(e) => e.result_type(),
            Expression::RelationshipNavigation(e) => e.result_type(),
            Expression::NewInstance(e) => e.result_type(),
            Expression::Ref(e) => e.result_type(),
            Expression::Deref(e) => e.result_type(),
            Expression::Scan(e) => e.result_type(),
            Expression::Comparison(e) => e.result_type(),
            Expression::And(e) => e.result_type(),
            Expression::Or(e) => e.result_type(),
            Expression::Not(e) => e.result_type(),
            Expression::IsNull(e) => e.result_type(),
            Expression::Filter(e) => e.result_type(),
            Expression::Project(e) => e.result_type(),
        }
    }
}

macro_rules! impl_expression_from {
    ($($node:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$node> for Expression {
                fn from(node: $node) -> Self {
                    Expression::$variant(node)
                }
            }
        )*
    };
}

impl_expression_from! {
    ConstantExpression => Constant,
    NullExpression => Null,
    VariableReferenceExpression => VariableReference,
    ParameterReferenceExpression => ParameterReference,
    PropertyExpression => Property,
    FunctionExpression => Function,
    LambdaExpression => Lambda,
    RelationshipNavigationExpression => RelationshipNavigation,
    NewInstanceExpression => NewInstance,
    RefExpression => Ref,
    DerefExpression => Deref,
    ScanExpression => Scan,
    ComparisonExpression => Comparison,
    AndExpression => And,
    OrExpression => Or,
    NotExpression => Not,
    IsNullExpression => IsNull,
    FilterExpression => Filter,
    ProjectExpression => Project,
}
