//! Type descriptors for the conceptual model.
//!
//! Descriptors are immutable once built and are shared between expression
//! nodes through [`TypeUsageRef`]. Nodes only ever hold handles to them.

use std::fmt;
use std::sync::Arc;

use smol_str::SmolStr;

use super::members::{EdmProperty, RelationshipType};
use crate::error::{ConstructionError, Result};

/// Shared handle to a type usage.
pub type TypeUsageRef = Arc<TypeUsage>;

// ============================================================================
// Primitive types
// ============================================================================

/// Primitive scalar types known to the conceptual model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveTypeKind {
    Binary,
    Boolean,
    Byte,
    Decimal,
    Double,
    Guid,
    Single,
    SByte,
    Int16,
    Int32,
    Int64,
    String,
}

impl PrimitiveTypeKind {
    /// Returns the qualified model name of this primitive type.
    pub fn name(self) -> &'static str {
        match self {
            Self::Binary => "Edm.Binary",
            Self::Boolean => "Edm.Boolean",
            Self::Byte => "Edm.Byte",
            Self::Decimal => "Edm.Decimal",
            Self::Double => "Edm.Double",
            Self::Guid => "Edm.Guid",
            Self::Single => "Edm.Single",
            Self::SByte => "Edm.SByte",
            Self::Int16 => "Edm.Int16",
            Self::Int32 => "Edm.Int32",
            Self::Int64 => "Edm.Int64",
            Self::String => "Edm.String",
        }
    }

    /// Returns true for the integral kinds usable as enum underlying types.
    pub fn is_integral(self) -> bool {
        matches!(
            self,
            Self::Byte | Self::SByte | Self::Int16 | Self::Int32 | Self::Int64
        )
    }
}

impl fmt::Display for PrimitiveTypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Named types
// ============================================================================

/// A named member of an enumeration type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    pub name: SmolStr,
    pub value: i64,
}

/// An enumeration type backed by an integral primitive type.
#[derive(Debug)]
pub struct EnumType {
    namespace: SmolStr,
    name: SmolStr,
    underlying: PrimitiveTypeKind,
    members: Vec<Arc<EnumMember>>,
}

impl EnumType {
    /// Creates an enum type. The underlying type must be integral.
    pub fn new(
        namespace: impl Into<SmolStr>,
        name: impl Into<SmolStr>,
        underlying: PrimitiveTypeKind,
    ) -> Result<Self> {
        if !underlying.is_integral() {
            return Err(ConstructionError::UnexpectedType {
                argument: "underlying",
                expected: "an integral primitive type",
                found: underlying.name().to_string(),
            });
        }
        Ok(Self {
            namespace: namespace.into(),
            name: name.into(),
            underlying,
            members: Vec::new(),
        })
    }

    pub fn with_member(mut self, name: impl Into<SmolStr>, value: i64) -> Self {
        self.members.push(Arc::new(EnumMember {
            name: name.into(),
            value,
        }));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_name(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }

    /// The integral type that carries this enum's values.
    pub fn underlying_type(&self) -> PrimitiveTypeKind {
        self.underlying
    }

    pub fn members(&self) -> &[Arc<EnumMember>] {
        &self.members
    }

    pub fn member(&self, name: &str) -> Option<&Arc<EnumMember>> {
        self.members.iter().find(|m| m.name == name)
    }
}

/// An entity type: a keyed structural type that may derive from a base type.
#[derive(Debug)]
pub struct EntityType {
    namespace: SmolStr,
    name: SmolStr,
    base_type: Option<Arc<EntityType>>,
    properties: Vec<Arc<EdmProperty>>,
    key_members: Vec<SmolStr>,
}

impl EntityType {
    pub fn new(namespace: impl Into<SmolStr>, name: impl Into<SmolStr>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            base_type: None,
            properties: Vec::new(),
            key_members: Vec::new(),
        }
    }

    pub fn with_base_type(mut self, base_type: Arc<EntityType>) -> Self {
        self.base_type = Some(base_type);
        self
    }

    /// Declares a structural property on this type.
    pub fn with_property(mut self, name: impl Into<SmolStr>, type_usage: TypeUsageRef) -> Self {
        self.properties
            .push(Arc::new(EdmProperty::new(name, type_usage)));
        self
    }

    /// Declares a key property; the property is added as well.
    pub fn with_key(mut self, name: impl Into<SmolStr>, type_usage: TypeUsageRef) -> Self {
        let name = name.into();
        self.key_members.push(name.clone());
        self.with_property(name, type_usage)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn full_name(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }

    pub fn base_type(&self) -> Option<&Arc<EntityType>> {
        self.base_type.as_ref()
    }

    /// All properties, inherited ones first.
    pub fn properties(&self) -> Vec<Arc<EdmProperty>> {
        let mut all = match &self.base_type {
            Some(base) => base.properties(),
            None => Vec::new(),
        };
        all.extend(self.properties.iter().cloned());
        all
    }

    /// Looks up a property on this type or any of its base types.
    pub fn property(&self, name: &str) -> Option<Arc<EdmProperty>> {
        self.properties
            .iter()
            .find(|p| p.name() == name)
            .cloned()
            .or_else(|| self.base_type.as_ref().and_then(|b| b.property(name)))
    }

    /// Key members; derived types inherit the key of their root type.
    pub fn key_members(&self) -> &[SmolStr] {
        match &self.base_type {
            Some(base) if self.key_members.is_empty() => base.key_members(),
            _ => &self.key_members,
        }
    }

    /// True when `other` appears somewhere on this type's base-type chain.
    pub fn derives_from(&self, other: &EntityType) -> bool {
        let mut current = self.base_type.as_ref();
        while let Some(base) = current {
            if base.full_name() == other.full_name() {
                return true;
            }
            current = base.base_type.as_ref();
        }
        false
    }
}

/// A named, unkeyed structural type.
#[derive(Debug)]
pub struct ComplexType {
    namespace: SmolStr,
    name: SmolStr,
    properties: Vec<Arc<EdmProperty>>,
}

impl ComplexType {
    pub fn new(namespace: impl Into<SmolStr>, name: impl Into<SmolStr>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            properties: Vec::new(),
        }
    }

    pub fn with_property(mut self, name: impl Into<SmolStr>, type_usage: TypeUsageRef) -> Self {
        self.properties
            .push(Arc::new(EdmProperty::new(name, type_usage)));
        self
    }

    pub fn full_name(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }

    pub fn properties(&self) -> &[Arc<EdmProperty>] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<Arc<EdmProperty>> {
        self.properties.iter().find(|p| p.name() == name).cloned()
    }
}

/// An anonymous record type. Rows compare structurally.
#[derive(Debug)]
pub struct RowType {
    properties: Vec<Arc<EdmProperty>>,
}

impl RowType {
    pub fn new<N: Into<SmolStr>>(columns: impl IntoIterator<Item = (N, TypeUsageRef)>) -> Self {
        Self {
            properties: columns
                .into_iter()
                .map(|(name, ty)| Arc::new(EdmProperty::new(name, ty)))
                .collect(),
        }
    }

    pub fn properties(&self) -> &[Arc<EdmProperty>] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<Arc<EdmProperty>> {
        self.properties.iter().find(|p| p.name() == name).cloned()
    }
}

// ============================================================================
// Type usages
// ============================================================================

/// The type part of a type usage.
#[derive(Debug, Clone)]
pub enum EdmType {
    Primitive(PrimitiveTypeKind),
    Enum(Arc<EnumType>),
    Entity(Arc<EntityType>),
    Complex(Arc<ComplexType>),
    Row(Arc<RowType>),
    /// Element type of a relationship set scan.
    Relationship(Arc<RelationshipType>),
    Collection(TypeUsageRef),
    /// Reference to an entity of the given type.
    Ref(Arc<EntityType>),
}

impl EdmType {
    /// Structural members visible on an instance of this type, if any.
    pub fn structural_property(&self, name: &str) -> Option<Arc<EdmProperty>> {
        match self {
            EdmType::Entity(entity) => entity.property(name),
            EdmType::Complex(complex) => complex.property(name),
            EdmType::Row(row) => row.property(name),
            _ => None,
        }
    }
}

impl fmt::Display for EdmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdmType::Primitive(kind) => write!(f, "{kind}"),
            EdmType::Enum(e) => write!(f, "{}", e.full_name()),
            EdmType::Entity(e) => write!(f, "{}", e.full_name()),
            EdmType::Complex(c) => write!(f, "{}", c.full_name()),
            EdmType::Relationship(r) => write!(f, "{}", r.full_name()),
            EdmType::Row(row) => {
                write!(f, "Row(")?;
                for (i, p) in row.properties().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} {}", p.name(), p.type_usage())?;
                }
                write!(f, ")")
            }
            EdmType::Collection(element) => write!(f, "Collection({element})"),
            EdmType::Ref(entity) => write!(f, "Ref({})", entity.full_name()),
        }
    }
}

/// A shared use of a type by an expression, property or parameter.
#[derive(Debug, Clone)]
pub struct TypeUsage {
    edm_type: EdmType,
}

impl TypeUsage {
    pub fn new(edm_type: EdmType) -> TypeUsageRef {
        Arc::new(Self { edm_type })
    }

    pub fn primitive(kind: PrimitiveTypeKind) -> TypeUsageRef {
        Self::new(EdmType::Primitive(kind))
    }

    pub fn enumeration(enum_type: &Arc<EnumType>) -> TypeUsageRef {
        Self::new(EdmType::Enum(Arc::clone(enum_type)))
    }

    pub fn entity(entity_type: &Arc<EntityType>) -> TypeUsageRef {
        Self::new(EdmType::Entity(Arc::clone(entity_type)))
    }

    pub fn complex(complex_type: &Arc<ComplexType>) -> TypeUsageRef {
        Self::new(EdmType::Complex(Arc::clone(complex_type)))
    }

    pub fn row(row_type: RowType) -> TypeUsageRef {
        Self::new(EdmType::Row(Arc::new(row_type)))
    }

    pub fn relationship(relationship: &Arc<RelationshipType>) -> TypeUsageRef {
        Self::new(EdmType::Relationship(Arc::clone(relationship)))
    }

    pub fn collection(element: TypeUsageRef) -> TypeUsageRef {
        Self::new(EdmType::Collection(element))
    }

    pub fn reference(entity_type: &Arc<EntityType>) -> TypeUsageRef {
        Self::new(EdmType::Ref(Arc::clone(entity_type)))
    }

    pub fn edm_type(&self) -> &EdmType {
        &self.edm_type
    }
}

impl fmt::Display for TypeUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.edm_type)
    }
}
