//! Entity sets and relationship sets.

use std::sync::Arc;

use smol_str::SmolStr;

use super::members::RelationshipType;
use super::types::{EdmType, EntityType, TypeUsage, TypeUsageRef};

#[derive(Debug)]
pub struct EntitySet {
    container: SmolStr,
    name: SmolStr,
    element_type: Arc<EntityType>,
}

impl EntitySet {
    pub fn new(
        container: impl Into<SmolStr>,
        name: impl Into<SmolStr>,
        element_type: &Arc<EntityType>,
    ) -> Arc<Self> {
        Arc::new(Self {
            container: container.into(),
            name: name.into(),
            element_type: Arc::clone(element_type),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    pub fn element_type(&self) -> &Arc<EntityType> {
        &self.element_type
    }
}

#[derive(Debug)]
pub struct RelationshipSet {
    container: SmolStr,
    name: SmolStr,
    relationship: Arc<RelationshipType>,
}

impl RelationshipSet {
    pub fn new(
        container: impl Into<SmolStr>,
        name: impl Into<SmolStr>,
        relationship: &Arc<RelationshipType>,
    ) -> Arc<Self> {
        Arc::new(Self {
            container: container.into(),
            name: name.into(),
            relationship: Arc::clone(relationship),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    pub fn relationship(&self) -> &Arc<RelationshipType> {
        &self.relationship
    }
}

/// Either kind of extent a scan can read.
#[derive(Debug, Clone)]
pub enum EntitySetBase {
    Entity(Arc<EntitySet>),
    Relationship(Arc<RelationshipSet>),
}

impl EntitySetBase {
    pub fn name(&self) -> &str {
        match self {
            EntitySetBase::Entity(set) => set.name(),
            EntitySetBase::Relationship(set) => set.name(),
        }
    }

    pub fn container(&self) -> &str {
        match self {
            EntitySetBase::Entity(set) => set.container(),
            EntitySetBase::Relationship(set) => set.container(),
        }
    }

    /// Element type of the extent.
    pub fn element_type(&self) -> EdmType {
        match self {
            EntitySetBase::Entity(set) => EdmType::Entity(Arc::clone(set.element_type())),
            EntitySetBase::Relationship(set) => {
                EdmType::Relationship(Arc::clone(set.relationship()))
            }
        }
    }

    /// `Collection(element)` usage produced by scanning this extent.
    pub fn scan_type(&self) -> TypeUsageRef {
        TypeUsage::collection(TypeUsage::new(self.element_type()))
    }
}

impl From<Arc<EntitySet>> for EntitySetBase {
    fn from(set: Arc<EntitySet>) -> Self {
        EntitySetBase::Entity(set)
    }
}

impl From<Arc<RelationshipSet>> for EntitySetBase {
    fn from(set: Arc<RelationshipSet>) -> Self {
        EntitySetBase::Relationship(set)
    }
}
