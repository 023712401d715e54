//! Indented textual rendering of a command tree.
//!
//! Each node renders as one line, `Kind(detail) : ResultType`, with its
//! children on the following lines indented two spaces deeper. Output is
//! deterministic and is used for diagnostics and snapshot tests.

use crate::expressions::{
    AndExpression, ComparisonExpression, ConstantExpression, DerefExpression, Expression,
    ExpressionKind, FilterExpression, FunctionExpression, IsNullExpression, LambdaExpression,
    NewInstanceExpression, NotExpression, NullExpression, OrExpression,
    ParameterReferenceExpression, ProjectExpression, PropertyExpression, RefExpression,
    RelationshipNavigationExpression, ScanExpression, VariableReferenceExpression,
};
use crate::metadata::TypeUsageRef;
use crate::visit::ExpressionVisitorWithResult;

const INDENT: &str = "  ";

#[derive(Debug, Clone, Default)]
pub struct ExpressionDumper {
    depth: usize,
}

impl ExpressionDumper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders `expression` and all of its descendants.
    pub fn dump(expression: &Expression) -> String {
        expression.accept_with_result(&mut Self::new())
    }

    fn header(&self, kind: ExpressionKind, detail: Option<String>, ty: &TypeUsageRef) -> String {
        let indent = INDENT.repeat(self.depth);
        match detail {
            Some(detail) => format!("{indent}{kind}({detail}) : {ty}"),
            None => format!("{indent}{kind} : {ty}"),
        }
    }

    fn render<'a>(
        &mut self,
        header: String,
        children: impl IntoIterator<Item = &'a Expression>,
    ) -> String {
        let mut out = header;
        self.depth += 1;
        for child in children {
            out.push('\n');
            out.push_str(&child.accept_with_result(self));
        }
        self.depth -= 1;
        out
    }
}

impl ExpressionVisitorWithResult for ExpressionDumper {
    type Output = String;

    fn visit_constant(&mut self, expression: &ConstantExpression) -> String {
        self.header(
            ExpressionKind::Constant,
            Some(expression.value_ref().to_string()),
            expression.result_type(),
        )
    }

    fn visit_null(&mut self, expression: &NullExpression) -> String {
        self.header(ExpressionKind::Null, None, expression.result_type())
    }

    fn visit_variable_reference(&mut self, expression: &VariableReferenceExpression) -> String {
        self.header(
            ExpressionKind::VariableReference,
            Some(expression.variable_name().to_string()),
            expression.result_type(),
        )
    }

    fn visit_parameter_reference(&mut self, expression: &ParameterReferenceExpression) -> String {
        self.header(
            ExpressionKind::ParameterReference,
            Some(format!("@{}", expression.parameter_name())),
            expression.result_type(),
        )
    }

    fn visit_property(&mut self, expression: &PropertyExpression) -> String {
        let header = self.header(
            ExpressionKind::Property,
            Some(expression.property().name().to_string()),
            expression.result_type(),
        );
        self.render(header, [expression.instance()])
    }

    fn visit_function(&mut self, expression: &FunctionExpression) -> String {
        let header = self.header(
            ExpressionKind::Function,
            Some(expression.function().full_name()),
            expression.result_type(),
        );
        self.render(header, expression.arguments())
    }

    fn visit_lambda(&mut self, expression: &LambdaExpression) -> String {
        let variables = expression
            .lambda()
            .variables()
            .iter()
            .map(|v| v.variable_name())
            .collect::<Vec<_>>()
            .join(", ");
        let header = self.header(ExpressionKind::Lambda, Some(variables), expression.result_type());
        self.render(
            header,
            expression
                .arguments()
                .iter()
                .chain([expression.lambda().body()]),
        )
    }

    fn visit_relationship_navigation(
        &mut self,
        expression: &RelationshipNavigationExpression,
    ) -> String {
        let detail = format!(
            "{}: {} -> {}",
            expression.relationship().full_name(),
            expression.navigate_from().name(),
            expression.navigate_to().name()
        );
        let header = self.header(
            ExpressionKind::RelationshipNavigation,
            Some(detail),
            expression.result_type(),
        );
        self.render(header, [expression.navigation_source()])
    }

    fn visit_new_instance(&mut self, expression: &NewInstanceExpression) -> String {
        let header = self.header(ExpressionKind::NewInstance, None, expression.result_type());
        let mut out = self.render(header, expression.arguments());
        for related in expression.related_entity_refs().unwrap_or_default() {
            let indent = INDENT.repeat(self.depth + 1);
            out.push_str(&format!(
                "\n{indent}RelatedEntityRef({} -> {})",
                related.source_end().name(),
                related.target_end().name()
            ));
            self.depth += 1;
            out = self.render(out, [related.target_entity_reference()]);
            self.depth -= 1;
        }
        out
    }

    fn visit_ref(&mut self, expression: &RefExpression) -> String {
        let header = self.header(
            ExpressionKind::Ref,
            Some(expression.entity_set().name().to_string()),
            expression.result_type(),
        );
        self.render(header, [expression.argument()])
    }

    fn visit_deref(&mut self, expression: &DerefExpression) -> String {
        let header = self.header(ExpressionKind::Deref, None, expression.result_type());
        self.render(header, [expression.argument()])
    }

    fn visit_scan(&mut self, expression: &ScanExpression) -> String {
        let target = expression.target();
        self.header(
            ExpressionKind::Scan,
            Some(format!("{}.{}", target.container(), target.name())),
            expression.result_type(),
        )
    }

    fn visit_comparison(&mut self, expression: &ComparisonExpression) -> String {
        let header = self.header(expression.operator().kind(), None, expression.result_type());
        self.render(header, [expression.left(), expression.right()])
    }

    fn visit_and(&mut self, expression: &AndExpression) -> String {
        let header = self.header(ExpressionKind::And, None, expression.result_type());
        self.render(header, [expression.left(), expression.right()])
    }

    fn visit_or(&mut self, expression: &OrExpression) -> String {
        let header = self.header(ExpressionKind::Or, None, expression.result_type());
        self.render(header, [expression.left(), expression.right()])
    }

    fn visit_not(&mut self, expression: &NotExpression) -> String {
        let header = self.header(ExpressionKind::Not, None, expression.result_type());
        self.render(header, [expression.argument()])
    }

    fn visit_is_null(&mut self, expression: &IsNullExpression) -> String {
        let header = self.header(ExpressionKind::IsNull, None, expression.result_type());
        self.render(header, [expression.argument()])
    }

    fn visit_filter(&mut self, expression: &FilterExpression) -> String {
        let header = self.header(
            ExpressionKind::Filter,
            Some(expression.input().variable_name().to_string()),
            expression.result_type(),
        );
        self.render(
            header,
            [expression.input().expression(), expression.predicate()],
        )
    }

    fn visit_project(&mut self, expression: &ProjectExpression) -> String {
        let header = self.header(
            ExpressionKind::Project,
            Some(expression.input().variable_name().to_string()),
            expression.result_type(),
        );
        self.render(
            header,
            [expression.input().expression(), expression.projection()],
        )
    }
}
