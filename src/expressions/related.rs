//! Related-entity references attached to entity constructors.
//!
//! A [`RelatedEntityRef`] declares, inline on a new-entity expression, that
//! the constructed entity is related to an existing entity through a to-one
//! relationship end. It is not a node of its own; see
//! [`crate::visit::walk_new_instance`] for how traversal reaches its target
//! reference.

use std::sync::Arc;

use smol_str::SmolStr;

use super::Expression;
use crate::error::{ConstructionError, Result};
use crate::metadata::{EdmType, RelationshipEndMember, TypeOracle};

#[derive(Debug, Clone)]
pub struct RelatedEntityRef {
    source_end: Arc<RelationshipEndMember>,
    target_end: Arc<RelationshipEndMember>,
    target_entity_reference: Box<Expression>,
}

impl RelatedEntityRef {
    /// Validates, in order, that:
    ///
    /// 1. both ends are declared by the same relationship,
    /// 2. the ends are distinct,
    /// 3. the target end has multiplicity one or zero-or-one,
    /// 4. the target entity reference has a reference result type,
    /// 5. the referenced entity type equals or derives from the target end's
    ///    entity type.
    pub fn new(
        oracle: &dyn TypeOracle,
        source_end: Arc<RelationshipEndMember>,
        target_end: Arc<RelationshipEndMember>,
        target_entity_reference: Expression,
    ) -> Result<Self> {
        if !source_end.shares_declaring_type(&target_end) {
            return Err(ConstructionError::TargetEndFromDifferentRelationship {
                argument: "target_end",
                source_relationship: source_end.declaring_name(),
                target_relationship: target_end.declaring_name(),
            });
        }

        if Arc::ptr_eq(&source_end, &target_end) {
            return Err(ConstructionError::TargetEndSameAsSourceEnd {
                argument: "target_end",
                end: SmolStr::new(target_end.name()),
            });
        }

        if !target_end.multiplicity().is_at_most_one() {
            return Err(ConstructionError::TargetEndMustBeAtMostOne {
                argument: "target_end",
                end: SmolStr::new(target_end.name()),
                multiplicity: SmolStr::new(target_end.multiplicity().to_string()),
            });
        }

        let reference_type = target_entity_reference.result_type();
        let Some(target_type) = oracle.ref_element_type(reference_type) else {
            return Err(ConstructionError::TargetEntityNotRef {
                argument: "target_entity_reference",
                found: reference_type.to_string(),
            });
        };

        let end_type = EdmType::Entity(Arc::clone(target_end.entity_type()));
        let target_type = EdmType::Entity(target_type);
        if !oracle.edm_equals(&end_type, &target_type) && !oracle.is_subtype_of(&target_type, &end_type)
        {
            return Err(ConstructionError::TargetEntityNotCompatible {
                argument: "target_entity_reference",
                expected: end_type.to_string(),
                found: target_type.to_string(),
            });
        }

        Ok(Self {
            source_end,
            target_end,
            target_entity_reference: Box::new(target_entity_reference),
        })
    }

    pub fn source_end(&self) -> &Arc<RelationshipEndMember> {
        &self.source_end
    }

    pub fn target_end(&self) -> &Arc<RelationshipEndMember> {
        &self.target_end
    }

    pub fn target_entity_reference(&self) -> &Expression {
        &self.target_entity_reference
    }
}
