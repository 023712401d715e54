//! Typed, immutable command trees for relational queries.
//!
//! A command tree is the intermediate form of a query or data-manipulation
//! statement between a query front end and a backend translator. Every node
//! is built through a fallible constructor that checks its invariants against
//! its children and the conceptual model, and no node can be mutated once
//! built. Passes walk finished trees through the visitor traits in [`visit`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use command_tree::metadata::{EntitySet, EntityType, PrimitiveTypeKind, TypeUsage};
//! use command_tree::visit::visitors::ExpressionDumper;
//! use command_tree::{CommandTree, EdmTypeSemantics, ExpressionBuilder};
//!
//! let customer = Arc::new(
//!     EntityType::new("Sales", "Customer")
//!         .with_key("Id", TypeUsage::primitive(PrimitiveTypeKind::Int32))
//!         .with_property("Name", TypeUsage::primitive(PrimitiveTypeKind::String)),
//! );
//! let customers = EntitySet::new("Store", "Customers", &customer);
//!
//! let b = ExpressionBuilder::new();
//! let input = b.bind(b.scan(customers)?, "c")?;
//! let name = b.property(input.variable().clone().into(), "Name")?;
//! let wanted = b.parameter("name", TypeUsage::primitive(PrimitiveTypeKind::String))?;
//! let query = b.filter(input, b.equal(name, wanted)?)?;
//! assert!(ExpressionDumper::dump(&query).starts_with("Filter(c) : Collection(Sales.Customer)"));
//!
//! let tree = CommandTree::query(&EdmTypeSemantics, query)?;
//! assert_eq!(tree.parameters().len(), 1);
//! # Ok::<(), command_tree::ConstructionError>(())
//! ```

pub mod builder;
pub mod command_tree;
pub mod error;
pub mod expressions;
pub mod metadata;
pub mod visit;

pub use builder::ExpressionBuilder;
pub use command_tree::{
    CommandTree, CommandTreeKind, CommandTreeOptions, DataSpace, SetClause,
    is_valid_parameter_name,
};
pub use error::{ConstructionError, ErrorCategory, Result};
pub use expressions::{Expression, ExpressionKind};
pub use metadata::{EdmTypeSemantics, TypeOracle};
pub use visit::{ExpressionVisitor, ExpressionVisitorWithResult};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_accessible() {
        let _builder: ExpressionBuilder = ExpressionBuilder::new();
        let _options = CommandTreeOptions::default();
        assert!(is_valid_parameter_name("p1"));
    }
}
