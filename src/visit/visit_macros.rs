/// Generates both visitor traits and the double-dispatch entry points from a
/// single node-kind table, so the two traversal forms can never disagree on
/// the set of kinds.
macro_rules! define_visit_api {
    ($( $variant:ident($node:ident) => $visit:ident ),* $(,)?) => {
/// A pass over a command tree that produces no value.
///
/// There is one required operation per concrete node kind and no defaults:
/// adding a node kind breaks every pass until it handles the new kind.
/// Recursion into children is explicit, through the `walk_*` helpers.
pub trait ExpressionVisitor {
    $(
        #[doc = concat!("Visits a [`", stringify!($node), "`].")]
        fn $visit(&mut self, expression: &$node);
    )*
}

/// A pass over a command tree that produces a value per node.
pub trait ExpressionVisitorWithResult {
    /// Value produced for each visited node.
    type Output;

    $(
        #[doc = concat!("Visits a [`", stringify!($node), "`].")]
        fn $visit(&mut self, expression: &$node) -> Self::Output;
    )*
}

impl Expression {
    /// Dispatches to the visitor operation for this node's concrete kind.
    pub fn accept<V: ExpressionVisitor + ?Sized>(&self, visitor: &mut V) {
        match self {
            $( Expression::$variant(node) => ExpressionVisitor::$visit(visitor, node), )*
        }
    }

    /// Dispatches to the value-producing operation for this node's concrete kind.
    pub fn accept_with_result<V: ExpressionVisitorWithResult + ?Sized>(
        &self,
        visitor: &mut V,
    ) -> V::Output {
        match self {
            $( Expression::$variant(node) => ExpressionVisitorWithResult::$visit(visitor, node), )*
        }
    }
}

$(
    impl $node {
        pub fn accept<V: ExpressionVisitor + ?Sized>(&self, visitor: &mut V) {
            ExpressionVisitor::$visit(visitor, self)
        }

        pub fn accept_with_result<V: ExpressionVisitorWithResult + ?Sized>(
            &self,
            visitor: &mut V,
        ) -> V::Output {
            ExpressionVisitorWithResult::$visit(visitor, self)
        }
    }
)*
    };
}

pub(crate) use define_visit_api;
