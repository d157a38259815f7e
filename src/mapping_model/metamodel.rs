//! Mapping metamodel: the registry of physical entity and embeddable
//! descriptors, keyed by entity name.

use std::collections::HashMap;

use indexmap::IndexMap;

use super::errors::MappingModelError;
use super::model_part::{
    AttributeMapping, BasicValuedMapping, DiscriminatorMapping, EmbeddableId,
    EmbeddableMappingType, EntityId, EntityMappingType,
};

#[derive(Debug, Clone, Default)]
pub struct MappingMetamodel {
    entities: Vec<EntityMappingType>,
    embeddables: Vec<EmbeddableMappingType>,
    entity_names: HashMap<String, EntityId>,
}

impl MappingMetamodel {
    /// Descriptor for an entity name, if one is registered
    pub fn find_entity_descriptor(&self, entity_name: &str) -> Option<&EntityMappingType> {
        self.entity_names
            .get(entity_name)
            .map(|id| &self.entities[id.0 as usize])
    }

    /// Descriptor for an entity name; absence is an error
    pub fn get_entity_descriptor(
        &self,
        entity_name: &str,
    ) -> Result<&EntityMappingType, MappingModelError> {
        self.find_entity_descriptor(entity_name)
            .ok_or_else(|| MappingModelError::UnknownEntity {
                entity_name: entity_name.to_string(),
            })
    }

    pub fn entity(&self, id: EntityId) -> &EntityMappingType {
        &self.entities[id.0 as usize]
    }

    pub fn embeddable(&self, id: EmbeddableId) -> &EmbeddableMappingType {
        &self.embeddables[id.0 as usize]
    }

    pub fn entity_descriptors(&self) -> impl Iterator<Item = &EntityMappingType> {
        self.entities.iter()
    }

    pub fn embeddable_descriptors(&self) -> impl Iterator<Item = &EmbeddableMappingType> {
        self.embeddables.iter()
    }

    /// Reflexive subtype check over entity descriptors
    pub fn is_subtype(&self, candidate: &EntityMappingType, supertype: &EntityMappingType) -> bool {
        let mut current = Some(candidate);
        while let Some(entity) = current {
            if entity.id == supertype.id {
                return true;
            }
            current = entity.supertype(self);
        }
        false
    }

    /// Root of the entity hierarchy `entity` belongs to
    pub fn root_entity<'m>(&'m self, entity: &'m EntityMappingType) -> &'m EntityMappingType {
        let mut root = entity;
        while let Some(supertype) = root.supertype(self) {
            root = supertype;
        }
        root
    }
}

#[derive(Debug, Default)]
pub struct MappingMetamodelBuilder {
    entities: Vec<EntityMappingType>,
    embeddables: Vec<EmbeddableMappingType>,
    entity_names: HashMap<String, EntityId>,
}

impl MappingMetamodelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare_entity(
        &mut self,
        entity_name: impl Into<String>,
        table_name: impl Into<String>,
    ) -> Result<EntityId, MappingModelError> {
        let entity_name = entity_name.into();
        if self.entity_names.contains_key(&entity_name) {
            return Err(MappingModelError::DuplicateEntity { entity_name });
        }
        let id = EntityId(self.entities.len() as u32);
        self.entities.push(EntityMappingType {
            id,
            entity_name: entity_name.clone(),
            table_name: table_name.into(),
            identifier_name: None,
            discriminator: None,
            supertype: None,
            subtypes: Vec::new(),
            attributes: IndexMap::new(),
        });
        self.entity_names.insert(entity_name, id);
        Ok(id)
    }

    pub fn entity_id(&self, entity_name: &str) -> Option<EntityId> {
        self.entity_names.get(entity_name).copied()
    }

    pub fn table_name(&self, id: EntityId) -> &str {
        &self.entities[id.0 as usize].table_name
    }

    pub fn set_supertype(&mut self, id: EntityId, supertype: EntityId) {
        self.entities[id.0 as usize].supertype = Some(supertype);
        self.entities[supertype.0 as usize].subtypes.push(id);
    }

    pub fn set_identifier(
        &mut self,
        id: EntityId,
        identifier: BasicValuedMapping,
    ) -> Result<(), MappingModelError> {
        let name = identifier.selectable_name.clone();
        self.add_attribute(id, AttributeMapping::Basic(identifier))?;
        self.entities[id.0 as usize].identifier_name = Some(name);
        Ok(())
    }

    pub fn set_discriminator(&mut self, id: EntityId, discriminator: DiscriminatorMapping) {
        self.entities[id.0 as usize].discriminator = Some(discriminator);
    }

    pub fn add_attribute(
        &mut self,
        id: EntityId,
        attribute: AttributeMapping,
    ) -> Result<(), MappingModelError> {
        let entity = &mut self.entities[id.0 as usize];
        if entity.attributes.contains_key(attribute.name()) {
            return Err(MappingModelError::DuplicateAttribute {
                owner: entity.entity_name.clone(),
                attribute: attribute.name().to_string(),
            });
        }
        entity
            .attributes
            .insert(attribute.name().to_string(), attribute);
        Ok(())
    }

    pub fn add_embeddable(
        &mut self,
        role: impl Into<String>,
        embeddable_name: impl Into<String>,
        table_expression: impl Into<String>,
    ) -> EmbeddableId {
        let id = EmbeddableId(self.embeddables.len() as u32);
        self.embeddables.push(EmbeddableMappingType {
            id,
            role: role.into(),
            embeddable_name: embeddable_name.into(),
            table_expression: table_expression.into(),
            attributes: IndexMap::new(),
        });
        id
    }

    pub fn add_embeddable_attribute(
        &mut self,
        id: EmbeddableId,
        attribute: AttributeMapping,
    ) -> Result<(), MappingModelError> {
        let embeddable = &mut self.embeddables[id.0 as usize];
        if embeddable.attributes.contains_key(attribute.name()) {
            return Err(MappingModelError::DuplicateAttribute {
                owner: embeddable.role.clone(),
                attribute: attribute.name().to_string(),
            });
        }
        embeddable
            .attributes
            .insert(attribute.name().to_string(), attribute);
        Ok(())
    }

    pub fn build(self) -> MappingMetamodel {
        log::debug!(
            "Mapping metamodel built with {} entities and {} embeddable usages",
            self.entities.len(),
            self.embeddables.len()
        );
        MappingMetamodel {
            entities: self.entities,
            embeddables: self.embeddables,
            entity_names: self.entity_names,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_model::BasicKind;
    use crate::mapping_model::model_part::{ModelPart, ModelPartContainer, ID_ROLE_NAME};

    fn node_metamodel() -> MappingMetamodel {
        let mut builder = MappingMetamodelBuilder::new();
        let node = builder.declare_entity("Node", "nodes").unwrap();
        let special = builder.declare_entity("SpecialNode", "nodes").unwrap();
        let other = builder.declare_entity("OtherNode", "nodes").unwrap();
        builder.set_supertype(special, node);
        builder.set_supertype(other, node);
        builder
            .set_identifier(
                node,
                BasicValuedMapping::new("id", "nodes", "node_id", BasicKind::Long),
            )
            .unwrap();
        builder
            .add_attribute(
                special,
                AttributeMapping::Basic(BasicValuedMapping::new(
                    "specialAttribute",
                    "nodes",
                    "special_attr",
                    BasicKind::String,
                )),
            )
            .unwrap();
        builder
            .add_attribute(
                other,
                AttributeMapping::Basic(BasicValuedMapping::new(
                    "otherAttribute",
                    "nodes",
                    "other_attr",
                    BasicKind::String,
                )),
            )
            .unwrap();
        builder.build()
    }

    #[test]
    fn test_find_and_get_entity_descriptor() {
        let metamodel = node_metamodel();
        assert!(metamodel.find_entity_descriptor("Node").is_some());
        assert!(metamodel.find_entity_descriptor("Edge").is_none());
        assert_eq!(
            metamodel.get_entity_descriptor("Edge").unwrap_err(),
            MappingModelError::UnknownEntity {
                entity_name: "Edge".to_string()
            }
        );
    }

    #[test]
    fn test_subtype_attributes_need_treat_target() {
        let metamodel = node_metamodel();
        let node = metamodel.get_entity_descriptor("Node").unwrap();
        let special = metamodel.get_entity_descriptor("SpecialNode").unwrap();
        let other = metamodel.get_entity_descriptor("OtherNode").unwrap();

        assert!(node
            .find_sub_part("specialAttribute", None, &metamodel)
            .is_none());
        assert!(matches!(
            node.find_sub_part("specialAttribute", Some(special), &metamodel),
            Some(ModelPart::Basic(_))
        ));
        // sibling branch stays invisible
        assert!(node
            .find_sub_part("specialAttribute", Some(other), &metamodel)
            .is_none());
    }

    #[test]
    fn test_inherited_identifier_visible_on_subtype() {
        let metamodel = node_metamodel();
        let special = metamodel.get_entity_descriptor("SpecialNode").unwrap();
        let id = special.find_sub_part("id", None, &metamodel).unwrap();
        assert_eq!(id.part_name(), "id");
        let by_role = special.find_sub_part(ID_ROLE_NAME, None, &metamodel).unwrap();
        assert_eq!(by_role, id);
    }

    #[test]
    fn test_hierarchy_navigation() {
        let metamodel = node_metamodel();
        let node = metamodel.get_entity_descriptor("Node").unwrap();
        let special = metamodel.get_entity_descriptor("SpecialNode").unwrap();
        assert!(metamodel.is_subtype(special, node));
        assert!(!metamodel.is_subtype(node, special));
        assert!(std::ptr::eq(metamodel.root_entity(special), node));
        let names: Vec<&str> = node
            .subtypes(&metamodel)
            .map(|entity| entity.entity_name.as_str())
            .collect();
        assert_eq!(names, vec!["SpecialNode", "OtherNode"]);
    }

    #[test]
    fn test_duplicate_entity_rejected() {
        let mut builder = MappingMetamodelBuilder::new();
        builder.declare_entity("Bid", "bids").unwrap();
        assert!(matches!(
            builder.declare_entity("Bid", "bids"),
            Err(MappingModelError::DuplicateEntity { .. })
        ));
    }
}
