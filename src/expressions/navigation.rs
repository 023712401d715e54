//! Single-child and extent nodes: property access, relationship navigation,
//! reference construction and dereference, and extent scans.

use std::sync::Arc;

use smol_str::SmolStr;

use super::Expression;
use crate::error::{ConstructionError, Result};
use crate::metadata::{
    EdmMember, EntitySet, EntitySetBase, RelationshipEndMember, RelationshipType, TypeOracle,
    TypeUsageRef,
};

/// Retrieval of a property from an instance.
#[derive(Debug, Clone)]
pub struct PropertyExpression {
    result_type: TypeUsageRef,
    property: EdmMember,
    instance: Box<Expression>,
}

impl PropertyExpression {
    /// The member must be a structural property, a navigation property or a
    /// relationship end.
    pub fn new(result_type: TypeUsageRef, property: EdmMember, instance: Expression) -> Result<Self> {
        if !property.is_readable_property() {
            return Err(ConstructionError::InvalidMemberKind {
                argument: "property",
                member: SmolStr::new(property.name()),
            });
        }
        Ok(Self {
            result_type,
            property,
            instance: Box::new(instance),
        })
    }

    pub fn result_type(&self) -> &TypeUsageRef {
        &self.result_type
    }

    pub fn property(&self) -> &EdmMember {
        &self.property
    }

    pub fn instance(&self) -> &Expression {
        &self.instance
    }
}

/// Navigation across a relationship from one end to the other.
#[derive(Debug, Clone)]
pub struct RelationshipNavigationExpression {
    result_type: TypeUsageRef,
    relationship: Arc<RelationshipType>,
    from_end: Arc<RelationshipEndMember>,
    to_end: Arc<RelationshipEndMember>,
    source: Box<Expression>,
}

impl RelationshipNavigationExpression {
    pub fn new(
        result_type: TypeUsageRef,
        relationship: Arc<RelationshipType>,
        from_end: Arc<RelationshipEndMember>,
        to_end: Arc<RelationshipEndMember>,
        source: Expression,
    ) -> Result<Self> {
        for (argument, end) in [("from_end", &from_end), ("to_end", &to_end)] {
            if !end.is_declared_by(&relationship) {
                return Err(ConstructionError::EndNotInRelationship {
                    argument,
                    end: SmolStr::new(end.name()),
                    relationship: SmolStr::new(relationship.full_name()),
                });
            }
        }
        Ok(Self {
            result_type,
            relationship,
            from_end,
            to_end,
            source: Box::new(source),
        })
    }

    pub fn result_type(&self) -> &TypeUsageRef {
        &self.result_type
    }

    pub fn relationship(&self) -> &Arc<RelationshipType> {
        &self.relationship
    }

    pub fn navigate_from(&self) -> &Arc<RelationshipEndMember> {
        &self.from_end
    }

    pub fn navigate_to(&self) -> &Arc<RelationshipEndMember> {
        &self.to_end
    }

    pub fn navigation_source(&self) -> &Expression {
        &self.source
    }
}

/// Construction of a reference to an entity in `entity_set` from key values.
#[derive(Debug, Clone)]
pub struct RefExpression {
    result_type: TypeUsageRef,
    entity_set: Arc<EntitySet>,
    keys: Box<Expression>,
}

impl RefExpression {
    pub fn new(
        oracle: &dyn TypeOracle,
        result_type: TypeUsageRef,
        entity_set: Arc<EntitySet>,
        keys: Expression,
    ) -> Result<Self> {
        if !oracle.is_reference(&result_type) {
            return Err(ConstructionError::UnexpectedType {
                argument: "result_type",
                expected: "a reference type",
                found: result_type.to_string(),
            });
        }
        Ok(Self {
            result_type,
            entity_set,
            keys: Box::new(keys),
        })
    }

    pub fn result_type(&self) -> &TypeUsageRef {
        &self.result_type
    }

    pub fn entity_set(&self) -> &Arc<EntitySet> {
        &self.entity_set
    }

    /// Key values the reference is built from.
    pub fn argument(&self) -> &Expression {
        &self.keys
    }
}

/// Retrieval of the entity a reference points at.
#[derive(Debug, Clone)]
pub struct DerefExpression {
    result_type: TypeUsageRef,
    reference: Box<Expression>,
}

impl DerefExpression {
    pub fn new(
        oracle: &dyn TypeOracle,
        result_type: TypeUsageRef,
        reference: Expression,
    ) -> Result<Self> {
        if !oracle.is_entity(&result_type) {
            return Err(ConstructionError::UnexpectedType {
                argument: "result_type",
                expected: "an entity type",
                found: result_type.to_string(),
            });
        }
        if !oracle.is_reference(reference.result_type()) {
            return Err(ConstructionError::UnexpectedType {
                argument: "reference",
                expected: "a reference type",
                found: reference.result_type().to_string(),
            });
        }
        Ok(Self {
            result_type,
            reference: Box::new(reference),
        })
    }

    pub fn result_type(&self) -> &TypeUsageRef {
        &self.result_type
    }

    pub fn argument(&self) -> &Expression {
        &self.reference
    }
}

/// Scan of every element of an entity or relationship set.
#[derive(Debug, Clone)]
pub struct ScanExpression {
    result_type: TypeUsageRef,
    target: EntitySetBase,
}

impl ScanExpression {
    /// `result_type` must be a collection of the extent's element type.
    pub fn new(
        oracle: &dyn TypeOracle,
        result_type: TypeUsageRef,
        target: EntitySetBase,
    ) -> Result<Self> {
        let element_matches = oracle
            .collection_element_type(&result_type)
            .is_some_and(|element| oracle.edm_equals(element.edm_type(), &target.element_type()));
        if !element_matches {
            return Err(ConstructionError::ResultTypeMismatch {
                argument: "result_type",
                expected: format!("Collection({})", target.element_type()),
                found: result_type.to_string(),
            });
        }
        Ok(Self {
            result_type,
            target,
        })
    }

    pub fn result_type(&self) -> &TypeUsageRef {
        &self.result_type
    }

    pub fn target(&self) -> &EntitySetBase {
        &self.target
    }
}
