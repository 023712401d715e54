//! Type compatibility oracle.
//!
//! Node constructors never inspect type descriptors directly. They ask a
//! [`TypeOracle`] whether a type is scalar, a collection, an entity, a
//! reference, or a subtype of another, so a metadata workspace with its own
//! compatibility rules can be plugged in without touching the nodes.
//!
//! # Example
//!
//! ```
//! use command_tree::metadata::{EdmTypeSemantics, PrimitiveTypeKind, TypeOracle, TypeUsage};
//!
//! let oracle = EdmTypeSemantics;
//! let int32 = TypeUsage::primitive(PrimitiveTypeKind::Int32);
//! let int64 = TypeUsage::primitive(PrimitiveTypeKind::Int64);
//!
//! assert!(oracle.is_scalar(&int32));
//! assert!(oracle.is_equal_or_promotable(&int32, &int64));
//! assert!(!oracle.is_equal_or_promotable(&int64, &int32));
//! ```

use std::sync::Arc;

use super::types::{EdmType, EntityType, PrimitiveTypeKind, TypeUsage, TypeUsageRef};

/// Answers type-lattice questions on behalf of node constructors.
///
/// Implementations must be pure: the same question always gets the same
/// answer, and no question mutates metadata.
pub trait TypeOracle: Send + Sync {
    /// Primitive or enumeration type.
    fn is_scalar(&self, ty: &TypeUsage) -> bool;

    fn is_primitive(&self, ty: &TypeUsage, kind: PrimitiveTypeKind) -> bool;

    fn is_boolean(&self, ty: &TypeUsage) -> bool {
        self.is_primitive(ty, PrimitiveTypeKind::Boolean)
    }

    fn is_collection(&self, ty: &TypeUsage) -> bool;

    fn is_entity(&self, ty: &TypeUsage) -> bool;

    fn is_reference(&self, ty: &TypeUsage) -> bool;

    fn is_row(&self, ty: &TypeUsage) -> bool;

    /// Entity, complex, row or relationship type.
    fn is_structural(&self, ty: &TypeUsage) -> bool;

    /// Type identity as understood by the model, ignoring facets.
    fn edm_equals(&self, left: &EdmType, right: &EdmType) -> bool;

    /// Strict subtyping: a type is not a subtype of itself.
    fn is_subtype_of(&self, sub: &EdmType, sup: &EdmType) -> bool;

    /// True when a value of `from` may be used where `to` is expected.
    fn is_equal_or_promotable(&self, from: &TypeUsage, to: &TypeUsage) -> bool;

    /// Primitive kind of a scalar type; enums yield their underlying type.
    fn underlying_primitive(&self, ty: &TypeUsage) -> Option<PrimitiveTypeKind>;

    /// Entity type a reference type points at.
    fn ref_element_type(&self, ty: &TypeUsage) -> Option<Arc<EntityType>>;

    fn collection_element_type(&self, ty: &TypeUsage) -> Option<TypeUsageRef>;
}

/// Default oracle over the in-memory model in [`crate::metadata`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EdmTypeSemantics;

impl EdmTypeSemantics {
    fn primitive_promotes_to(from: PrimitiveTypeKind, to: PrimitiveTypeKind) -> bool {
        use PrimitiveTypeKind::*;

        if from == to {
            return true;
        }
        match from {
            Byte => matches!(to, Int16 | Int32 | Int64 | Decimal | Single | Double),
            SByte => matches!(to, Int16 | Int32 | Int64 | Decimal | Single | Double),
            Int16 => matches!(to, Int32 | Int64 | Decimal | Single | Double),
            Int32 => matches!(to, Int64 | Decimal | Single | Double),
            Int64 => matches!(to, Decimal | Single | Double),
            Decimal => matches!(to, Single | Double),
            Single => matches!(to, Double),
            _ => false,
        }
    }
}

impl TypeOracle for EdmTypeSemantics {
    fn is_scalar(&self, ty: &TypeUsage) -> bool {
        matches!(ty.edm_type(), EdmType::Primitive(_) | EdmType::Enum(_))
    }

    fn is_primitive(&self, ty: &TypeUsage, kind: PrimitiveTypeKind) -> bool {
        matches!(ty.edm_type(), EdmType::Primitive(k) if *k == kind)
    }

    fn is_collection(&self, ty: &TypeUsage) -> bool {
        matches!(ty.edm_type(), EdmType::Collection(_))
    }

    fn is_entity(&self, ty: &TypeUsage) -> bool {
        matches!(ty.edm_type(), EdmType::Entity(_))
    }

    fn is_reference(&self, ty: &TypeUsage) -> bool {
        matches!(ty.edm_type(), EdmType::Ref(_))
    }

    fn is_row(&self, ty: &TypeUsage) -> bool {
        matches!(ty.edm_type(), EdmType::Row(_))
    }

    fn is_structural(&self, ty: &TypeUsage) -> bool {
        matches!(
            ty.edm_type(),
            EdmType::Entity(_) | EdmType::Complex(_) | EdmType::Row(_) | EdmType::Relationship(_)
        )
    }

    fn edm_equals(&self, left: &EdmType, right: &EdmType) -> bool {
        match (left, right) {
            (EdmType::Primitive(a), EdmType::Primitive(b)) => a == b,
            (EdmType::Enum(a), EdmType::Enum(b)) => {
                Arc::ptr_eq(a, b) || a.full_name() == b.full_name()
            }
            (EdmType::Entity(a), EdmType::Entity(b)) | (EdmType::Ref(a), EdmType::Ref(b)) => {
                Arc::ptr_eq(a, b) || a.full_name() == b.full_name()
            }
            (EdmType::Complex(a), EdmType::Complex(b)) => {
                Arc::ptr_eq(a, b) || a.full_name() == b.full_name()
            }
            (EdmType::Relationship(a), EdmType::Relationship(b)) => {
                Arc::ptr_eq(a, b) || a.full_name() == b.full_name()
            }
            (EdmType::Row(a), EdmType::Row(b)) => {
                Arc::ptr_eq(a, b)
                    || (a.properties().len() == b.properties().len()
                        && a.properties().iter().zip(b.properties()).all(|(p, q)| {
                            p.name() == q.name()
                                && self.edm_equals(p.type_usage().edm_type(), q.type_usage().edm_type())
                        }))
            }
            (EdmType::Collection(a), EdmType::Collection(b)) => {
                self.edm_equals(a.edm_type(), b.edm_type())
            }
            _ => false,
        }
    }

    fn is_subtype_of(&self, sub: &EdmType, sup: &EdmType) -> bool {
        match (sub, sup) {
            (EdmType::Entity(a), EdmType::Entity(b)) | (EdmType::Ref(a), EdmType::Ref(b)) => {
                a.derives_from(b)
            }
            (EdmType::Collection(a), EdmType::Collection(b)) => {
                self.is_subtype_of(a.edm_type(), b.edm_type())
            }
            _ => false,
        }
    }

    fn is_equal_or_promotable(&self, from: &TypeUsage, to: &TypeUsage) -> bool {
        let (from, to) = (from.edm_type(), to.edm_type());
        if self.edm_equals(from, to) || self.is_subtype_of(from, to) {
            return true;
        }
        match (from, to) {
            (EdmType::Primitive(a), EdmType::Primitive(b)) => Self::primitive_promotes_to(*a, *b),
            (EdmType::Collection(a), EdmType::Collection(b)) => self.is_equal_or_promotable(a, b),
            (EdmType::Row(a), EdmType::Row(b)) => {
                a.properties().len() == b.properties().len()
                    && a.properties().iter().zip(b.properties()).all(|(p, q)| {
                        p.name() == q.name()
                            && self.is_equal_or_promotable(p.type_usage(), q.type_usage())
                    })
            }
            _ => false,
        }
    }

    fn underlying_primitive(&self, ty: &TypeUsage) -> Option<PrimitiveTypeKind> {
        match ty.edm_type() {
            EdmType::Primitive(kind) => Some(*kind),
            EdmType::Enum(e) => Some(e.underlying_type()),
            _ => None,
        }
    }

    fn ref_element_type(&self, ty: &TypeUsage) -> Option<Arc<EntityType>> {
        match ty.edm_type() {
            EdmType::Ref(entity) => Some(Arc::clone(entity)),
            _ => None,
        }
    }

    fn collection_element_type(&self, ty: &TypeUsage) -> Option<TypeUsageRef> {
        match ty.edm_type() {
            EdmType::Collection(element) => Some(Arc::clone(element)),
            _ => None,
        }
    }
}
