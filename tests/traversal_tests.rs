//! Double dispatch and child traversal.

mod common;

use std::sync::Arc;

use command_tree::expressions::{
    AndExpression, ComparisonExpression, ConstantExpression, DerefExpression, Expression,
    ExpressionKind, FilterExpression, FunctionExpression, IsNullExpression, LambdaExpression,
    NewInstanceExpression, NotExpression, NullExpression, OrExpression,
    ParameterReferenceExpression, ProjectExpression, PropertyExpression, RefExpression,
    RelationshipNavigationExpression, ScanExpression, VariableReferenceExpression,
};
use command_tree::metadata::TypeUsage;
use command_tree::visit::visitors::{ExpressionDumper, KindCounter, ParameterCollector};
use command_tree::visit::{
    walk_and, walk_comparison, walk_deref, walk_filter, walk_function, walk_is_null, walk_lambda,
    walk_new_instance, walk_not, walk_or, walk_project, walk_property, walk_ref,
    walk_relationship_navigation,
};
use command_tree::{ExpressionBuilder, ExpressionVisitor, ExpressionVisitorWithResult};
use common::{SalesModel, entity_ref, int32, sales_model};
use pretty_assertions::assert_eq;

/// Records which operation fired, without descending.
#[derive(Default)]
struct DispatchRecorder {
    fired: Vec<&'static str>,
}

impl ExpressionVisitor for DispatchRecorder {
    fn visit_constant(&mut self, _: &ConstantExpression) {
        self.fired.push("constant");
    }
    fn visit_null(&mut self, _: &NullExpression) {
        self.fired.push("null");
    }
    fn visit_variable_reference(&mut self, _: &VariableReferenceExpression) {
        self.fired.push("variable_reference");
    }
    fn visit_parameter_reference(&mut self, _: &ParameterReferenceExpression) {
        self.fired.push("parameter_reference");
    }
    fn visit_property(&mut self, _: &PropertyExpression) {
        self.fired.push("property");
    }
    fn visit_function(&mut self, _: &FunctionExpression) {
        self.fired.push("function");
    }
    fn visit_lambda(&mut self, _: &LambdaExpression) {
        self.fired.push("lambda");
    }
    fn visit_relationship_navigation(&mut self, _: &RelationshipNavigationExpression) {
        self.fired.push("relationship_navigation");
    }
    fn visit_new_instance(&mut self, _: &NewInstanceExpression) {
        self.fired.push("new_instance");
    }
    fn visit_ref(&mut self, _: &RefExpression) {
        self.fired.push("ref");
    }
    fn visit_deref(&mut self, _: &DerefExpression) {
        self.fired.push("deref");
    }
    fn visit_scan(&mut self, _: &ScanExpression) {
        self.fired.push("scan");
    }
    fn visit_comparison(&mut self, _: &ComparisonExpression) {
        self.fired.push("comparison");
    }
    fn visit_and(&mut self, _: &AndExpression) {
        self.fired.push("and");
    }
    fn visit_or(&mut self, _: &OrExpression) {
        self.fired.push("or");
    }
    fn visit_not(&mut self, _: &NotExpression) {
        self.fired.push("not");
    }
    fn visit_is_null(&mut self, _: &IsNullExpression) {
        self.fired.push("is_null");
    }
    fn visit_filter(&mut self, _: &FilterExpression) {
        self.fired.push("filter");
    }
    fn visit_project(&mut self, _: &ProjectExpression) {
        self.fired.push("project");
    }
}

/// Returns the name of the operation that fired.
struct DispatchNamer;

impl ExpressionVisitorWithResult for DispatchNamer {
    type Output = &'static str;

    fn visit_constant(&mut self, _: &ConstantExpression) -> &'static str {
        "constant"
    }
    fn visit_null(&mut self, _: &NullExpression) -> &'static str {
        "null"
    }
    fn visit_variable_reference(&mut self, _: &VariableReferenceExpression) -> &'static str {
        "variable_reference"
    }
    fn visit_parameter_reference(&mut self, _: &ParameterReferenceExpression) -> &'static str {
        "parameter_reference"
    }
    fn visit_property(&mut self, _: &PropertyExpression) -> &'static str {
        "property"
    }
    fn visit_function(&mut self, _: &FunctionExpression) -> &'static str {
        "function"
    }
    fn visit_lambda(&mut self, _: &LambdaExpression) -> &'static str {
        "lambda"
    }
    fn visit_relationship_navigation(&mut self, _: &RelationshipNavigationExpression) -> &'static str {
        "relationship_navigation"
    }
    fn visit_new_instance(&mut self, _: &NewInstanceExpression) -> &'static str {
        "new_instance"
    }
    fn visit_ref(&mut self, _: &RefExpression) -> &'static str {
        "ref"
    }
    fn visit_deref(&mut self, _: &DerefExpression) -> &'static str {
        "deref"
    }
    fn visit_scan(&mut self, _: &ScanExpression) -> &'static str {
        "scan"
    }
    fn visit_comparison(&mut self, _: &ComparisonExpression) -> &'static str {
        "comparison"
    }
    fn visit_and(&mut self, _: &AndExpression) -> &'static str {
        "and"
    }
    fn visit_or(&mut self, _: &OrExpression) -> &'static str {
        "or"
    }
    fn visit_not(&mut self, _: &NotExpression) -> &'static str {
        "not"
    }
    fn visit_is_null(&mut self, _: &IsNullExpression) -> &'static str {
        "is_null"
    }
    fn visit_filter(&mut self, _: &FilterExpression) -> &'static str {
        "filter"
    }
    fn visit_project(&mut self, _: &ProjectExpression) -> &'static str {
        "project"
    }
}

/// Records every node in pre-order by walking all children.
#[derive(Default)]
struct PreOrder {
    kinds: Vec<ExpressionKind>,
}

impl ExpressionVisitor for PreOrder {
    fn visit_constant(&mut self, _: &ConstantExpression) {
        self.kinds.push(ExpressionKind::Constant);
    }
    fn visit_null(&mut self, _: &NullExpression) {
        self.kinds.push(ExpressionKind::Null);
    }
    fn visit_variable_reference(&mut self, _: &VariableReferenceExpression) {
        self.kinds.push(ExpressionKind::VariableReference);
    }
    fn visit_parameter_reference(&mut self, _: &ParameterReferenceExpression) {
        self.kinds.push(ExpressionKind::ParameterReference);
    }
    fn visit_property(&mut self, e: &PropertyExpression) {
        self.kinds.push(ExpressionKind::Property);
        walk_property(self, e);
    }
    fn visit_function(&mut self, e: &FunctionExpression) {
        self.kinds.push(ExpressionKind::Function);
        walk_function(self, e);
    }
    fn visit_lambda(&mut self, e: &LambdaExpression) {
        self.kinds.push(ExpressionKind::Lambda);
        walk_lambda(self, e);
    }
    fn visit_relationship_navigation(&mut self, e: &RelationshipNavigationExpression) {
        self.kinds.push(ExpressionKind::RelationshipNavigation);
        walk_relationship_navigation(self, e);
    }
    fn visit_new_instance(&mut self, e: &NewInstanceExpression) {
        self.kinds.push(ExpressionKind::NewInstance);
        walk_new_instance(self, e);
    }
    fn visit_ref(&mut self, e: &RefExpression) {
        self.kinds.push(ExpressionKind::Ref);
        walk_ref(self, e);
    }
    fn visit_deref(&mut self, e: &DerefExpression) {
        self.kinds.push(ExpressionKind::Deref);
        walk_deref(self, e);
    }
    fn visit_scan(&mut self, _: &ScanExpression) {
        self.kinds.push(ExpressionKind::Scan);
    }
    fn visit_comparison(&mut self, e: &ComparisonExpression) {
        self.kinds.push(e.operator().kind());
        walk_comparison(self, e);
    }
    fn visit_and(&mut self, e: &AndExpression) {
        self.kinds.push(ExpressionKind::And);
        walk_and(self, e);
    }
    fn visit_or(&mut self, e: &OrExpression) {
        self.kinds.push(ExpressionKind::Or);
        walk_or(self, e);
    }
    fn visit_not(&mut self, e: &NotExpression) {
        self.kinds.push(ExpressionKind::Not);
        walk_not(self, e);
    }
    fn visit_is_null(&mut self, e: &IsNullExpression) {
        self.kinds.push(ExpressionKind::IsNull);
        walk_is_null(self, e);
    }
    fn visit_filter(&mut self, e: &FilterExpression) {
        self.kinds.push(ExpressionKind::Filter);
        walk_filter(self, e);
    }
    fn visit_project(&mut self, e: &ProjectExpression) {
        self.kinds.push(ExpressionKind::Project);
        walk_project(self, e);
    }
}

/// One node of every concrete kind, paired with the operation it must hit.
fn one_of_each(model: &SalesModel, b: &ExpressionBuilder) -> Vec<(&'static str, Expression)> {
    let one = || b.constant(1).expect("constant");
    let yes = || b.constant(true).expect("constant");
    let order = || {
        b.variable("o", TypeUsage::entity(&model.order))
            .expect("variable")
    };
    let order_ref = || entity_ref(b, &model.orders, one());
    let orders = || b.scan(Arc::clone(&model.orders)).expect("scan");

    let lambda = b
        .lambda([("x", int32())], b.variable("x", int32()).expect("variable"))
        .expect("lambda");

    vec![
        ("constant", one()),
        ("null", b.null(int32()).expect("null")),
        ("variable_reference", order()),
        ("parameter_reference", b.parameter("p", int32()).expect("parameter")),
        ("property", b.property(order(), "Total").expect("property")),
        ("function", b.function(&model.order_total, vec![one()]).expect("function")),
        ("lambda", b.invoke(lambda, vec![one()]).expect("invoke")),
        (
            "relationship_navigation",
            b.navigate(order_ref(), &model.order_end(), &model.line_items_end())
                .expect("navigate"),
        ),
        ("new_instance", b.new_row([("a", one())]).expect("row")),
        ("ref", order_ref()),
        ("deref", b.deref(order_ref()).expect("deref")),
        ("scan", orders()),
        ("comparison", b.greater_than(one(), one()).expect("comparison")),
        ("and", b.and(yes(), yes()).expect("and")),
        ("or", b.or(yes(), yes()).expect("or")),
        ("not", b.not(yes()).expect("not")),
        ("is_null", b.is_null(b.null(int32()).expect("null")).expect("is_null")),
        (
            "filter",
            b.filter(b.bind(orders(), "o").expect("bind"), yes())
                .expect("filter"),
        ),
        (
            "project",
            b.project(b.bind(orders(), "o").expect("bind"), one())
                .expect("project"),
        ),
    ]
}

#[test]
fn each_kind_dispatches_to_its_own_operation() {
    let model = sales_model();
    let builder = ExpressionBuilder::new();
    let samples = one_of_each(&model, &builder);
    assert_eq!(samples.len(), 19);

    for (expected, expression) in &samples {
        let mut recorder = DispatchRecorder::default();
        expression.accept(&mut recorder);
        assert_eq!(recorder.fired, vec![*expected], "unit dispatch for {}", expression.kind());

        assert_eq!(
            expression.accept_with_result(&mut DispatchNamer),
            *expected,
            "value dispatch for {}",
            expression.kind()
        );
    }
}

#[test]
fn node_level_accept_matches_enum_dispatch() {
    let builder = ExpressionBuilder::new();
    let Expression::Comparison(comparison) = builder
        .equal(builder.constant(1).expect("constant"), builder.constant(2).expect("constant"))
        .expect("comparison")
    else {
        panic!("expected a comparison");
    };

    let mut recorder = DispatchRecorder::default();
    comparison.accept(&mut recorder);
    assert_eq!(recorder.fired, vec!["comparison"]);
    assert_eq!(comparison.accept_with_result(&mut DispatchNamer), "comparison");
}

#[test]
fn visitors_can_be_used_through_trait_objects() {
    let builder = ExpressionBuilder::new();
    let expression = builder.constant(1).expect("constant");

    let mut recorder = DispatchRecorder::default();
    let visitor: &mut dyn ExpressionVisitor = &mut recorder;
    expression.accept(visitor);
    assert_eq!(recorder.fired, vec!["constant"]);
}

#[test]
fn walk_visits_children_in_stored_order() {
    let model = sales_model();
    let b = ExpressionBuilder::new();
    let input = b
        .bind(b.scan(Arc::clone(&model.orders)).expect("scan"), "o")
        .expect("bind");
    let total = b
        .property(input.variable().clone().into(), "Total")
        .expect("property");
    let discounted = b
        .function(
            &model.discount,
            vec![total, b.parameter("pct", int32()).expect("parameter")],
        )
        .expect("function");
    let predicate = b
        .greater_than(discounted, b.constant(100).expect("constant"))
        .expect("comparison");
    let tree = b.filter(input, predicate).expect("filter");

    let mut order = PreOrder::default();
    tree.accept(&mut order);
    assert_eq!(
        order.kinds,
        vec![
            ExpressionKind::Filter,
            ExpressionKind::Scan,
            ExpressionKind::GreaterThan,
            ExpressionKind::Function,
            ExpressionKind::Property,
            ExpressionKind::VariableReference,
            ExpressionKind::ParameterReference,
            ExpressionKind::Constant,
        ]
    );
}

#[test]
fn lambda_walk_visits_arguments_then_body() {
    let b = ExpressionBuilder::new();
    let body = b
        .is_null(b.variable("x", int32()).expect("variable"))
        .expect("is_null");
    let lambda = b.lambda([("x", int32())], body).expect("lambda");
    let applied = b
        .invoke(lambda, vec![b.parameter("arg", int32()).expect("parameter")])
        .expect("invoke");

    let mut order = PreOrder::default();
    applied.accept(&mut order);
    assert_eq!(
        order.kinds,
        vec![
            ExpressionKind::Lambda,
            ExpressionKind::ParameterReference,
            ExpressionKind::IsNull,
            ExpressionKind::VariableReference,
        ]
    );
}

#[test]
fn related_entity_targets_are_walked_after_elements() {
    let model = sales_model();
    let b = ExpressionBuilder::new();
    let order_ref = entity_ref(&b, &model.orders, b.parameter("orderId", int32()).expect("parameter"));
    let related = b
        .related_entity_ref(&model.line_items_end(), &model.order_end(), order_ref)
        .expect("related reference");
    let item = b
        .new_entity_with_relationships(
            &model.line_item,
            vec![
                b.constant(1).expect("constant"),
                b.parameter("quantity", int32()).expect("parameter"),
            ],
            vec![related],
        )
        .expect("entity constructor");

    let mut order = PreOrder::default();
    item.accept(&mut order);
    assert_eq!(
        order.kinds,
        vec![
            ExpressionKind::NewInstance,
            ExpressionKind::Constant,
            ExpressionKind::ParameterReference,
            ExpressionKind::Ref,
            ExpressionKind::NewInstance,
            ExpressionKind::ParameterReference,
        ]
    );

    let names: Vec<String> = ParameterCollector::collect(&item)
        .iter()
        .map(|p| p.parameter_name().to_string())
        .collect();
    assert_eq!(names, vec!["quantity", "orderId"]);
}

#[test]
fn kind_counter_covers_whole_tree() {
    let model = sales_model();
    let b = ExpressionBuilder::new();
    let input = b
        .bind(b.scan(Arc::clone(&model.customers)).expect("scan"), "c")
        .expect("bind");
    let name = b
        .property(input.variable().clone().into(), "Name")
        .expect("property");
    let tree = b.project(input, name).expect("project");

    let counts = KindCounter::count(&tree);
    assert_eq!(counts.get(&ExpressionKind::Project), Some(&1));
    assert_eq!(counts.get(&ExpressionKind::Scan), Some(&1));
    assert_eq!(counts.get(&ExpressionKind::Property), Some(&1));
    assert_eq!(counts.get(&ExpressionKind::VariableReference), Some(&1));
    assert_eq!(counts.values().sum::<usize>(), 4);
}

#[test]
fn dumper_renders_filter_tree() {
    let model = sales_model();
    let b = ExpressionBuilder::new();
    let input = b
        .bind(b.scan(Arc::clone(&model.customers)).expect("scan"), "c")
        .expect("bind");
    let name = b
        .property(input.variable().clone().into(), "Name")
        .expect("property");
    let predicate = b
        .equal(name, b.parameter("name", common::string()).expect("parameter"))
        .expect("comparison");
    let tree = b.filter(input, predicate).expect("filter");

    let expected = "\
Filter(c) : Collection(Sales.Customer)
  Scan(SalesContainer.Customers) : Collection(Sales.Customer)
  Equals : Edm.Boolean
    Property(Name) : Edm.String
      VariableReference(c) : Sales.Customer
    ParameterReference(@name) : Edm.String";
    assert_eq!(ExpressionDumper::dump(&tree), expected);
}

#[test]
fn dumper_renders_related_entity_references() {
    let model = sales_model();
    let b = ExpressionBuilder::new();
    let related = b
        .related_entity_ref(
            &model.line_items_end(),
            &model.order_end(),
            entity_ref(&b, &model.orders, b.constant(7).expect("constant")),
        )
        .expect("related reference");
    let item = b
        .new_entity_with_relationships(
            &model.line_item,
            vec![b.constant(1).expect("constant"), b.constant(2).expect("constant")],
            vec![related],
        )
        .expect("entity constructor");

    let expected = "\
NewInstance : Sales.LineItem
  Constant(1) : Edm.Int32
  Constant(2) : Edm.Int32
  RelatedEntityRef(LineItems -> Order)
    Ref(Orders) : Ref(Sales.Order)
      NewInstance : Row(Id Edm.Int32)
        Constant(7) : Edm.Int32";
    assert_eq!(ExpressionDumper::dump(&item), expected);
}
