//! Node kind histogram.

use std::collections::BTreeMap;

use crate::expressions::{
    AndExpression, ComparisonExpression, ConstantExpression, DerefExpression, Expression,
    ExpressionKind, FilterExpression, FunctionExpression, IsNullExpression, LambdaExpression,
    NewInstanceExpression, NotExpression, NullExpression, OrExpression,
    ParameterReferenceExpression, ProjectExpression, PropertyExpression, RefExpression,
    RelationshipNavigationExpression, ScanExpression, VariableReferenceExpression,
};
use crate::visit::{
    ExpressionVisitor, walk_and, walk_comparison, walk_deref, walk_filter, walk_function,
    walk_is_null, walk_lambda, walk_new_instance, walk_not, walk_or, walk_project,
    walk_property, walk_ref, walk_relationship_navigation,
};

/// Counts the nodes of each kind in a tree.
#[derive(Debug, Clone, Default)]
pub struct KindCounter {
    counts: BTreeMap<ExpressionKind, usize>,
}

impl KindCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts node kinds in a single expression.
    pub fn count(expression: &Expression) -> BTreeMap<ExpressionKind, usize> {
        let mut counter = Self::new();
        expression.accept(&mut counter);
        counter.counts
    }

    /// Number of nodes of `kind` seen so far.
    pub fn get(&self, kind: ExpressionKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// Total number of nodes seen so far.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    fn record(&mut self, kind: ExpressionKind) {
        *self.counts.entry(kind).or_insert(0) += 1;
    }
}

impl ExpressionVisitor for KindCounter {
    fn visit_constant(&mut self, _expression: &ConstantExpression) {
        self.record(ExpressionKind::Constant);
    }

    fn visit_null(&mut self, _expression: &NullExpression) {
        self.record(ExpressionKind::Null);
    }

    fn visit_variable_reference(&mut self, _expression: &VariableReferenceExpression) {
        self.record(ExpressionKind::VariableReference);
    }

    fn visit_parameter_reference(&mut self, _expression: &ParameterReferenceExpression) {
        self.record(ExpressionKind::ParameterReference);
    }

    fn visit_property(&mut self, expression: &PropertyExpression) {
        self.record(ExpressionKind::Property);
        walk_property(self, expression);
    }

    fn visit_function(&mut self, expression: &FunctionExpression) {
        self.record(ExpressionKind::Function);
        walk_function(self, expression);
    }

    fn visit_lambda(&mut self, expression: &LambdaExpression) {
        self.record(ExpressionKind::Lambda);
        walk_lambda(self, expression);
    }

    fn visit_relationship_navigation(&mut self, expression: &RelationshipNavigationExpression) {
        self.record(ExpressionKind::RelationshipNavigation);
        walk_relationship_navigation(self, expression);
    }

    fn visit_new_instance(&mut self, expression: &NewInstanceExpression) {
        self.record(ExpressionKind::NewInstance);
        walk_new_instance(self, expression);
    }

    fn visit_ref(&mut self, expression: &RefExpression) {
        self.record(ExpressionKind::Ref);
        walk_ref(self, expression);
    }

    fn visit_deref(&mut self, expression: &DerefExpression) {
        self.record(ExpressionKind::Deref);
        walk_deref(self, expression);
    }

    fn visit_scan(&mut self, _expression: &ScanExpression) {
        self.record(ExpressionKind::Scan);
    }

    fn visit_comparison(&mut self, expression: &ComparisonExpression) {
        self.record(expression.operator().kind());
        walk_comparison(self, expression);
    }

    fn visit_and(&mut self, expression: &AndExpression) {
        self.record(ExpressionKind::And);
        walk_and(self, expression);
    }

    fn visit_or(&mut self, expression: &OrExpression) {
        self.record(ExpressionKind::Or);
        walk_or(self, expression);
    }

    fn visit_not(&mut self, expression: &NotExpression) {
        self.record(ExpressionKind::Not);
        walk_not(self, expression);
    }

    fn visit_is_null(&mut self, expression: &IsNullExpression) {
        self.record(ExpressionKind::IsNull);
        walk_is_null(self, expression);
    }

    fn visit_filter(&mut self, expression: &FilterExpression) {
        self.record(ExpressionKind::Filter);
        walk_filter(self, expression);
    }

    fn visit_project(&mut self, expression: &ProjectExpression) {
        self.record(ExpressionKind::Project);
        walk_project(self, expression);
    }
}
