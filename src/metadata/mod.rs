//! Conceptual-model metadata referenced by expression nodes.
//!
//! Expression nodes hold shared handles into this model but never own or
//! mutate it. The [`TypeOracle`] trait is the seam through which node
//! constructors ask type-compatibility questions.

mod function;
mod members;
mod semantics;
mod sets;
mod types;

pub use function::{EdmFunction, FunctionParameter};
pub use members::{
    EdmMember, EdmProperty, EndDeclaration, NavigationProperty, RelationshipEndMember,
    RelationshipMultiplicity, RelationshipType,
};
pub use semantics::{EdmTypeSemantics, TypeOracle};
pub use sets::{EntitySet, EntitySetBase, RelationshipSet};
pub use types::{
    ComplexType, EdmType, EntityType, EnumMember, EnumType, PrimitiveTypeKind, RowType, TypeUsage,
    TypeUsageRef,
};
