//! Double-dispatch traversal over command trees.
//!
//! Passes implement [`ExpressionVisitor`] (no result) or
//! [`ExpressionVisitorWithResult`] (one value per node). Each node's
//! `accept`/`accept_with_result` calls exactly the operation for its own
//! concrete kind. The visitor is a `&mut` borrow, so an absent visitor cannot
//! be expressed and traversal never silently no-ops.

mod visit_macros;
mod walk;
pub mod visitors;

use crate::expressions::{
    AndExpression, ComparisonExpression, ConstantExpression, DerefExpression, Expression,
    FilterExpression, FunctionExpression, IsNullExpression, LambdaExpression,
    NewInstanceExpression, NotExpression, NullExpression, OrExpression,
    ParameterReferenceExpression, ProjectExpression, PropertyExpression, RefExpression,
    RelationshipNavigationExpression, ScanExpression, VariableReferenceExpression,
};

use visit_macros::define_visit_api;

pub use walk::{
    walk_and, walk_comparison, walk_deref, walk_filter, walk_function, walk_is_null, walk_lambda,
    walk_new_instance, walk_not, walk_or, walk_project, walk_property, walk_ref,
    walk_relationship_navigation,
};

define_visit_api! {
    Constant(ConstantExpression) => visit_constant,
    Null(NullExpression) => visit_null,
    VariableReference(VariableReferenceExpression) => visit_variable_reference,
    ParameterReference(ParameterReferenceExpression) => visit_parameter_reference,
    Property(PropertyExpression) => visit_property,
    Function(FunctionExpression) => visit_function,
    Lambda(LambdaExpression) => visit_lambda,
    RelationshipNavigation(RelationshipNavigationExpression) => visit_relationship_navigation,
    NewInstance(NewInstanceExpression) => visit_new_instance,
    Ref(RefExpression) => visit_ref,
    Deref(DerefExpression) => visit_deref,
    Scan(ScanExpression) => visit_scan,
    Comparison(ComparisonExpression) => visit_comparison,
    And(AndExpression) => visit_and,
    Or(OrExpression) => visit_or,
    Not(NotExpression) => visit_not,
    IsNull(IsNullExpression) => visit_is_null,
    Filter(FilterExpression) => visit_filter,
    Project(ProjectExpression) => visit_project,
}
