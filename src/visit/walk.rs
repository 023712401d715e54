//! Child traversal helpers.
//!
//! A pass that wants to descend calls the `walk_*` function for the node it
//! is visiting. Children are visited in their stored order.

use super::ExpressionVisitor;
use crate::expressions::{
    AndExpression, ComparisonExpression, DerefExpression, FilterExpression, FunctionExpression,
    IsNullExpression, LambdaExpression, NewInstanceExpression, NotExpression, OrExpression,
    ProjectExpression, PropertyExpression, RefExpression, RelationshipNavigationExpression,
};

pub fn walk_property<V: ExpressionVisitor + ?Sized>(visitor: &mut V, expression: &PropertyExpression) {
    expression.instance().accept(visitor);
}

pub fn walk_function<V: ExpressionVisitor + ?Sized>(visitor: &mut V, expression: &FunctionExpression) {
    for argument in expression.arguments() {
        argument.accept(visitor);
    }
}

/// Visits the arguments, then the lambda body.
pub fn walk_lambda<V: ExpressionVisitor + ?Sized>(visitor: &mut V, expression: &LambdaExpression) {
    for argument in expression.arguments() {
        argument.accept(visitor);
    }
    expression.lambda().body().accept(visitor);
}

pub fn walk_relationship_navigation<V: ExpressionVisitor + ?Sized>(
    visitor: &mut V,
    expression: &RelationshipNavigationExpression,
) {
    expression.navigation_source().accept(visitor);
}

/// Visits the elements, then the target reference of each related-entity
/// reference. Related-entity references have no visitor operation of their own.
pub fn walk_new_instance<V: ExpressionVisitor + ?Sized>(
    visitor: &mut V,
    expression: &NewInstanceExpression,
) {
    for element in expression.arguments() {
        element.accept(visitor);
    }
    for related in expression.related_entity_refs().unwrap_or_default() {
        related.target_entity_reference().accept(visitor);
    }
}

pub fn walk_ref<V: ExpressionVisitor + ?Sized>(visitor: &mut V, expression: &RefExpression) {
    expression.argument().accept(visitor);
}

pub fn walk_deref<V: ExpressionVisitor + ?Sized>(visitor: &mut V, expression: &DerefExpression) {
    expression.argument().accept(visitor);
}

pub fn walk_comparison<V: ExpressionVisitor + ?Sized>(
    visitor: &mut V,
    expression: &ComparisonExpression,
) {
    expression.left().accept(visitor);
    expression.right().accept(visitor);
}

pub fn walk_and<V: ExpressionVisitor + ?Sized>(visitor: &mut V, expression: &AndExpression) {
    expression.left().accept(visitor);
    expression.right().accept(visitor);
}

pub fn walk_or<V: ExpressionVisitor + ?Sized>(visitor: &mut V, expression: &OrExpression) {
    expression.left().accept(visitor);
    expression.right().accept(visitor);
}

pub fn walk_not<V: ExpressionVisitor + ?Sized>(visitor: &mut V, expression: &NotExpression) {
    expression.argument().accept(visitor);
}

pub fn walk_is_null<V: ExpressionVisitor + ?Sized>(visitor: &mut V, expression: &IsNullExpression) {
    expression.argument().accept(visitor);
}

/// Visits the bound input, then the predicate.
pub fn walk_filter<V: ExpressionVisitor + ?Sized>(visitor: &mut V, expression: &FilterExpression) {
    expression.input().expression().accept(visitor);
    expression.predicate().accept(visitor);
}

pub fn walk_project<V: ExpressionVisitor + ?Sized>(visitor: &mut V, expression: &ProjectExpression) {
    expression.input().expression().accept(visitor);
    expression.projection().accept(visitor);
}
