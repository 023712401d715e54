//! Members of structural types and relationship metadata.

use std::fmt;
use std::sync::{Arc, Weak};

use smol_str::SmolStr;

use super::types::{EntityType, EnumMember, TypeUsage, TypeUsageRef};

/// A structural (scalar, complex or row-valued) property.
#[derive(Debug)]
pub struct EdmProperty {
    name: SmolStr,
    type_usage: TypeUsageRef,
}

impl EdmProperty {
    pub fn new(name: impl Into<SmolStr>, type_usage: TypeUsageRef) -> Self {
        Self {
            name: name.into(),
            type_usage,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_usage(&self) -> &TypeUsageRef {
        &self.type_usage
    }
}

/// How many instances may occupy one end of a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationshipMultiplicity {
    One,
    ZeroOrOne,
    Many,
}

impl RelationshipMultiplicity {
    pub fn is_at_most_one(self) -> bool {
        matches!(self, Self::One | Self::ZeroOrOne)
    }
}

impl fmt::Display for RelationshipMultiplicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One => write!(f, "1"),
            Self::ZeroOrOne => write!(f, "0..1"),
            Self::Many => write!(f, "*"),
        }
    }
}

/// Declaration of one end used when building a [`RelationshipType`].
#[derive(Debug, Clone)]
pub struct EndDeclaration {
    pub name: SmolStr,
    pub entity_type: Arc<EntityType>,
    pub multiplicity: RelationshipMultiplicity,
}

impl EndDeclaration {
    pub fn new(
        name: impl Into<SmolStr>,
        entity_type: &Arc<EntityType>,
        multiplicity: RelationshipMultiplicity,
    ) -> Self {
        Self {
            name: name.into(),
            entity_type: Arc::clone(entity_type),
            multiplicity,
        }
    }
}

/// One end of a relationship type.
///
/// The end keeps a weak handle to the relationship that declares it, so the
/// relationship and its ends do not form a reference cycle.
#[derive(Debug)]
pub struct RelationshipEndMember {
    name: SmolStr,
    multiplicity: RelationshipMultiplicity,
    entity_type: Arc<EntityType>,
    type_usage: TypeUsageRef,
    declaring_type: Weak<RelationshipType>,
}

impl RelationshipEndMember {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn multiplicity(&self) -> RelationshipMultiplicity {
        self.multiplicity
    }

    /// Entity type reachable by navigating to this end.
    pub fn entity_type(&self) -> &Arc<EntityType> {
        &self.entity_type
    }

    /// `Ref(EntityType)` usage of this end.
    pub fn type_usage(&self) -> &TypeUsageRef {
        &self.type_usage
    }

    /// Relationship that declares this end, while it is still alive.
    pub fn declaring_type(&self) -> Option<Arc<RelationshipType>> {
        self.declaring_type.upgrade()
    }

    /// True when both ends were declared by the very same relationship.
    pub fn shares_declaring_type(&self, other: &RelationshipEndMember) -> bool {
        Weak::ptr_eq(&self.declaring_type, &other.declaring_type)
    }

    pub fn is_declared_by(&self, relationship: &RelationshipType) -> bool {
        std::ptr::eq(self.declaring_type.as_ptr(), relationship)
    }

    pub(crate) fn declaring_name(&self) -> SmolStr {
        self.declaring_type()
            .map(|r| SmolStr::new(r.full_name()))
            .unwrap_or_default()
    }
}

/// A relationship (association) between two entity types.
#[derive(Debug)]
pub struct RelationshipType {
    namespace: SmolStr,
    name: SmolStr,
    ends: Vec<Arc<RelationshipEndMember>>,
}

impl RelationshipType {
    /// Builds an association with the given ends.
    pub fn new(
        namespace: impl Into<SmolStr>,
        name: impl Into<SmolStr>,
        ends: impl IntoIterator<Item = EndDeclaration>,
    ) -> Arc<Self> {
        let namespace = namespace.into();
        let name = name.into();
        let declarations: Vec<EndDeclaration> = ends.into_iter().collect();
        Arc::new_cyclic(|declaring: &Weak<RelationshipType>| RelationshipType {
            namespace,
            name,
            ends: declarations
                .into_iter()
                .map(|end| {
                    Arc::new(RelationshipEndMember {
                        type_usage: TypeUsage::reference(&end.entity_type),
                        name: end.name,
                        multiplicity: end.multiplicity,
                        entity_type: end.entity_type,
                        declaring_type: declaring.clone(),
                    })
                })
                .collect(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_name(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }

    pub fn ends(&self) -> &[Arc<RelationshipEndMember>] {
        &self.ends
    }

    pub fn end(&self, name: &str) -> Option<&Arc<RelationshipEndMember>> {
        self.ends.iter().find(|e| e.name() == name)
    }
}

/// A navigation property: a named traversal of a relationship from one end.
#[derive(Debug)]
pub struct NavigationProperty {
    name: SmolStr,
    relationship: Arc<RelationshipType>,
    from_end: Arc<RelationshipEndMember>,
    to_end: Arc<RelationshipEndMember>,
    type_usage: TypeUsageRef,
}

impl NavigationProperty {
    /// Returns `None` when either end is not declared by `relationship`.
    pub fn new(
        name: impl Into<SmolStr>,
        relationship: &Arc<RelationshipType>,
        from_end: &str,
        to_end: &str,
    ) -> Option<Self> {
        let from_end = Arc::clone(relationship.end(from_end)?);
        let to_end = Arc::clone(relationship.end(to_end)?);
        let target = TypeUsage::entity(to_end.entity_type());
        let type_usage = if to_end.multiplicity().is_at_most_one() {
            target
        } else {
            TypeUsage::collection(target)
        };
        Some(Self {
            name: name.into(),
            relationship: Arc::clone(relationship),
            from_end,
            to_end,
            type_usage,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn relationship(&self) -> &Arc<RelationshipType> {
        &self.relationship
    }

    pub fn from_end(&self) -> &Arc<RelationshipEndMember> {
        &self.from_end
    }

    pub fn to_end(&self) -> &Arc<RelationshipEndMember> {
        &self.to_end
    }

    /// Entity type, or collection of it for many-valued targets.
    pub fn type_usage(&self) -> &TypeUsageRef {
        &self.type_usage
    }
}

/// Any member a type can declare.
#[derive(Debug, Clone)]
pub enum EdmMember {
    Property(Arc<EdmProperty>),
    NavigationProperty(Arc<NavigationProperty>),
    RelationshipEnd(Arc<RelationshipEndMember>),
    /// Enum members are members of the model but cannot be read off an instance.
    EnumMember(Arc<EnumMember>),
}

impl EdmMember {
    pub fn name(&self) -> &str {
        match self {
            EdmMember::Property(p) => p.name(),
            EdmMember::NavigationProperty(n) => n.name(),
            EdmMember::RelationshipEnd(e) => e.name(),
            EdmMember::EnumMember(m) => &m.name,
        }
    }

    /// Declared type of the member, if it has one.
    pub fn type_usage(&self) -> Option<&TypeUsageRef> {
        match self {
            EdmMember::Property(p) => Some(p.type_usage()),
            EdmMember::NavigationProperty(n) => Some(n.type_usage()),
            EdmMember::RelationshipEnd(e) => Some(e.type_usage()),
            EdmMember::EnumMember(_) => None,
        }
    }

    /// True for the members a property expression may read.
    pub fn is_readable_property(&self) -> bool {
        matches!(
            self,
            EdmMember::Property(_) | EdmMember::NavigationProperty(_) | EdmMember::RelationshipEnd(_)
        )
    }
}

impl From<Arc<EdmProperty>> for EdmMember {
    fn from(property: Arc<EdmProperty>) -> Self {
        EdmMember::Property(property)
    }
}

impl From<Arc<NavigationProperty>> for EdmMember {
    fn from(property: Arc<NavigationProperty>) -> Self {
        EdmMember::NavigationProperty(property)
    }
}

impl From<Arc<RelationshipEndMember>> for EdmMember {
    fn from(end: Arc<RelationshipEndMember>) -> Self {
        EdmMember::RelationshipEnd(end)
    }
}
