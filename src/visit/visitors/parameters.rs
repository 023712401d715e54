//! Parameter reference collection.

use crate::expressions::{
    AndExpression, ComparisonExpression, ConstantExpression, DerefExpression, Expression,
    FilterExpression, FunctionExpression, IsNullExpression, LambdaExpression,
    NewInstanceExpression, NotExpression, NullExpression, OrExpression,
    ParameterReferenceExpression, ProjectExpression, PropertyExpression, RefExpression,
    RelationshipNavigationExpression, ScanExpression, VariableReferenceExpression,
};
use crate::visit::{
    ExpressionVisitor, walk_and, walk_comparison, walk_deref, walk_filter, walk_function,
    walk_is_null, walk_lambda, walk_new_instance, walk_not, walk_or, walk_project,
    walk_property, walk_ref, walk_relationship_navigation,
};

/// Collects every parameter reference in a tree, in traversal order.
///
/// Repeated references to the same name are all kept so that a caller can
/// detect conflicting declarations.
#[derive(Debug, Clone, Default)]
pub struct ParameterCollector {
    references: Vec<ParameterReferenceExpression>,
}

impl ParameterCollector {
    /// Creates a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects parameter references from a single expression.
    pub fn collect(expression: &Expression) -> Vec<ParameterReferenceExpression> {
        let mut collector = Self::new();
        expression.accept(&mut collector);
        collector.references
    }

    /// Returns the collected references.
    pub fn references(&self) -> &[ParameterReferenceExpression] {
        &self.references
    }

    pub fn into_references(self) -> Vec<ParameterReferenceExpression> {
        self.references
    }
}

impl ExpressionVisitor for ParameterCollector {
    fn visit_constant(&mut self, _expression: &ConstantExpression) {}

    fn visit_null(&mut self, _expression: &NullExpression) {}

    fn visit_variable_reference(&mut self, _expression: &VariableReferenceExpression) {}

    fn visit_parameter_reference(&mut self, expression: &ParameterReferenceExpression) {
        self.references.push(expression.clone());
    }

    fn visit_property(&mut self, expression: &PropertyExpression) {
        walk_property(self, expression);
    }

    fn visit_function(&mut self, expression: &FunctionExpression) {
        walk_function(self, expression);
    }

    fn visit_lambda(&mut self, expression: &LambdaExpression) {
        walk_lambda(self, expression);
    }

    fn visit_relationship_navigation(&mut self, expression: &RelationshipNavigationExpression) {
        walk_relationship_navigation(self, expression);
    }

    fn visit_new_instance(&mut self, expression: &NewInstanceExpression) {
        walk_new_instance(self, expression);
    }

    fn visit_ref(&mut self, expression: &RefExpression) {
        walk_ref(self, expression);
    }

    fn visit_deref(&mut self, expression: &DerefExpression) {
        walk_deref(self, expression);
    }

    fn visit_scan(&mut self, _expression: &ScanExpression) {}

    fn visit_comparison(&mut self, expression: &ComparisonExpression) {
        walk_comparison(self, expression);
    }

    fn visit_and(&mut self, expression: &AndExpression) {
        walk_and(self, expression);
    }

    fn visit_or(&mut self, expression: &OrExpression) {
        walk_or(self, expression);
    }

    fn visit_not(&mut self, expression: &NotExpression) {
        walk_not(self, expression);
    }

    fn visit_is_null(&mut self, expression: &IsNullExpression) {
        walk_is_null(self, expression);
    }

    fn visit_filter(&mut self, expression: &FilterExpression) {
        walk_filter(self, expression);
    }

    fn visit_project(&mut self, expression: &ProjectExpression) {
        walk_project(self, expression);
    }
}
