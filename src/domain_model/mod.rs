//! Logical domain model.
//!
//! [`DomainModel`] is an arena of [`DomainType`]s addressed by [`DomainTypeId`].
//! It is assembled once through [`DomainModelBuilder`] and never mutated after
//! [`DomainModelBuilder::build`], so it can be shared by every query
//! compilation without synchronisation.
//!
//! Attribute lookup by name is the only navigation primitive. Lookups walk the
//! supertype chain, so attributes declared on a mapped supertype or an entity
//! supertype are visible on every subtype.

pub mod domain_type;
pub mod errors;

use std::collections::{HashMap, HashSet};

pub use domain_type::{
    AnyMappingDomainType, AttributeNature, BasicDomainType, BasicKind, CollectionClassification,
    DomainType, DomainTypeId, EmbeddableDomainType, EntityDomainType, MappedSupertypeDomainType,
    PersistenceType, SqmAttribute, TupleType,
};
pub use errors::DomainModelError;

#[derive(Debug, Clone)]
pub struct DomainModel {
    types: Vec<DomainType>,
    names: HashMap<String, DomainTypeId>,
    basics: HashMap<BasicKind, DomainTypeId>,
}

impl DomainModel {
    pub fn get(&self, id: DomainTypeId) -> &DomainType {
        &self.types[id.index()]
    }

    pub fn type_name(&self, id: DomainTypeId) -> String {
        self.get(id).type_name()
    }

    /// Find a named (managed or tuple) type
    pub fn find_type(&self, name: &str) -> Option<DomainTypeId> {
        self.names.get(name).copied()
    }

    pub fn basic_type_id(&self, kind: BasicKind) -> Option<DomainTypeId> {
        self.basics.get(&kind).copied()
    }

    pub fn entity(&self, name: &str) -> Option<(DomainTypeId, &EntityDomainType)> {
        let id = self.find_type(name)?;
        match self.get(id) {
            DomainType::Entity(entity) => Some((id, entity)),
            _ => None,
        }
    }

    pub fn type_ids(&self) -> impl Iterator<Item = DomainTypeId> + '_ {
        (0..self.types.len()).map(|index| DomainTypeId(index as u32))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// The type itself followed by its supertypes, nearest first
    pub fn supertype_chain(&self, id: DomainTypeId) -> Vec<DomainTypeId> {
        let mut chain = vec![id];
        let mut current = self.get(id).supertype();
        while let Some(supertype) = current {
            chain.push(supertype);
            current = self.get(supertype).supertype();
        }
        chain
    }

    /// Reflexive subtype check
    pub fn is_subtype_of(&self, candidate: DomainTypeId, supertype: DomainTypeId) -> bool {
        self.supertype_chain(candidate).contains(&supertype)
    }

    /// Entities declaring `id` as their direct supertype
    pub fn direct_subtypes(&self, id: DomainTypeId) -> Vec<DomainTypeId> {
        self.type_ids()
            .filter(|candidate| self.get(*candidate).supertype() == Some(id))
            .collect()
    }

    /// Resolve an attribute by name, searching declared attributes first and then
    /// the supertype chain. Returns the declaring type alongside the attribute.
    pub fn find_attribute(
        &self,
        owner: DomainTypeId,
        name: &str,
    ) -> Option<(DomainTypeId, &SqmAttribute)> {
        self.supertype_chain(owner).into_iter().find_map(|declaring| {
            self.get(declaring)
                .declared_attributes()
                .iter()
                .find(|attribute| attribute.name == name)
                .map(|attribute| (declaring, attribute))
        })
    }

    /// All attributes visible on `owner`, inherited ones first
    pub fn attributes(&self, owner: DomainTypeId) -> Vec<(DomainTypeId, &SqmAttribute)> {
        let mut chain = self.supertype_chain(owner);
        chain.reverse();
        chain
            .into_iter()
            .flat_map(|declaring| {
                self.get(declaring)
                    .declared_attributes()
                    .iter()
                    .map(move |attribute| (declaring, attribute))
            })
            .collect()
    }
}

/// Two-phase builder: declare every named type first so attributes can refer to
/// types declared later, then attach attributes and supertypes.
#[derive(Debug, Default)]
pub struct DomainModelBuilder {
    types: Vec<DomainType>,
    names: HashMap<String, DomainTypeId>,
    basics: HashMap<BasicKind, DomainTypeId>,
    anys: HashMap<(BasicKind, BasicKind), DomainTypeId>,
}

impl DomainModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, domain_type: DomainType) -> DomainTypeId {
        let id = DomainTypeId(self.types.len() as u32);
        self.types.push(domain_type);
        id
    }

    fn push_named(&mut self, domain_type: DomainType) -> Result<DomainTypeId, DomainModelError> {
        let type_name = domain_type.type_name();
        if self.names.contains_key(&type_name) {
            return Err(DomainModelError::DuplicateType { type_name });
        }
        let id = self.push(domain_type);
        self.names.insert(type_name, id);
        Ok(id)
    }

    /// Interned basic type for `kind`
    pub fn basic(&mut self, kind: BasicKind) -> DomainTypeId {
        if let Some(id) = self.basics.get(&kind) {
            return *id;
        }
        let id = self.push(DomainType::Basic(BasicDomainType { kind }));
        self.basics.insert(kind, id);
        id
    }

    /// Interned any-mapping type for a (discriminator, key) pair. The component
    /// basic types are interned too so path sources can be built for them.
    pub fn any(&mut self, discriminator_kind: BasicKind, key_kind: BasicKind) -> DomainTypeId {
        if let Some(id) = self.anys.get(&(discriminator_kind, key_kind)) {
            return *id;
        }
        self.basic(discriminator_kind);
        self.basic(key_kind);
        let id = self.push(DomainType::Any(AnyMappingDomainType {
            discriminator_kind,
            key_kind,
        }));
        self.anys.insert((discriminator_kind, key_kind), id);
        id
    }

    pub fn declare_entity(
        &mut self,
        name: impl Into<String>,
        is_abstract: bool,
    ) -> Result<DomainTypeId, DomainModelError> {
        self.push_named(DomainType::Entity(EntityDomainType {
            name: name.into(),
            attributes: Vec::new(),
            supertype: None,
            is_abstract,
        }))
    }

    pub fn declare_embeddable(
        &mut self,
        name: impl Into<String>,
    ) -> Result<DomainTypeId, DomainModelError> {
        self.push_named(DomainType::Embedded(EmbeddableDomainType {
            name: name.into(),
            attributes: Vec::new(),
        }))
    }

    pub fn declare_mapped_supertype(
        &mut self,
        name: impl Into<String>,
    ) -> Result<DomainTypeId, DomainModelError> {
        self.push_named(DomainType::MappedSupertype(MappedSupertypeDomainType {
            name: name.into(),
            attributes: Vec::new(),
            supertype: None,
        }))
    }

    pub fn declare_tuple(
        &mut self,
        name: impl Into<String>,
        components: Vec<(String, BasicKind)>,
    ) -> Result<DomainTypeId, DomainModelError> {
        self.push_named(DomainType::Tuple(TupleType {
            name: name.into(),
            components,
        }))
    }

    pub fn lookup(&self, name: &str) -> Option<DomainTypeId> {
        self.names.get(name).copied()
    }

    pub fn set_supertype(
        &mut self,
        id: DomainTypeId,
        supertype: DomainTypeId,
    ) -> Result<(), DomainModelError> {
        let supertype_name = self.types[supertype.index()].type_name();
        if !matches!(
            self.types[supertype.index()],
            DomainType::Entity(_) | DomainType::MappedSupertype(_)
        ) {
            return Err(DomainModelError::InvalidSupertype {
                type_name: self.types[id.index()].type_name(),
                supertype: supertype_name,
            });
        }
        match &mut self.types[id.index()] {
            DomainType::Entity(entity) => entity.supertype = Some(supertype),
            DomainType::MappedSupertype(mapped) => mapped.supertype = Some(supertype),
            other => {
                return Err(DomainModelError::InvalidSupertype {
                    type_name: other.type_name(),
                    supertype: supertype_name,
                })
            }
        }
        Ok(())
    }

    pub fn add_attribute(
        &mut self,
        owner: DomainTypeId,
        attribute: SqmAttribute,
    ) -> Result<(), DomainModelError> {
        if let AttributeNature::Plural {
            classification,
            index_type: None,
        } = attribute.nature
        {
            if classification.is_indexed() {
                return Err(DomainModelError::MissingIndexType {
                    owner: self.types[owner.index()].type_name(),
                    attribute: attribute.name,
                });
            }
        }

        let owner_type = &mut self.types[owner.index()];
        let owner_name = owner_type.type_name();
        let attributes = match owner_type {
            DomainType::Entity(entity) => &mut entity.attributes,
            DomainType::Embedded(embeddable) => &mut embeddable.attributes,
            DomainType::MappedSupertype(mapped) => &mut mapped.attributes,
            DomainType::Basic(_) | DomainType::Any(_) | DomainType::Tuple(_) => {
                return Err(DomainModelError::NotManaged {
                    type_name: owner_name,
                })
            }
        };
        if attributes.iter().any(|existing| existing.name == attribute.name) {
            return Err(DomainModelError::DuplicateAttribute {
                owner: owner_name,
                attribute: attribute.name,
            });
        }
        attributes.push(attribute);
        Ok(())
    }

    /// Check supertype chains and inherited name clashes, then freeze the model
    pub fn build(self) -> Result<DomainModel, DomainModelError> {
        for (index, domain_type) in self.types.iter().enumerate() {
            let mut seen = HashSet::from([index]);
            let mut current = domain_type.supertype();
            while let Some(supertype) = current {
                if !seen.insert(supertype.index()) {
                    return Err(DomainModelError::SupertypeCycle {
                        type_name: domain_type.type_name(),
                    });
                }
                current = self.types[supertype.index()].supertype();
            }
        }

        let model = DomainModel {
            types: self.types,
            names: self.names,
            basics: self.basics,
        };

        for id in model.type_ids() {
            let mut names = HashSet::new();
            for (_, attribute) in model.attributes(id) {
                if !names.insert(attribute.name.as_str()) {
                    return Err(DomainModelError::DuplicateAttribute {
                        owner: model.type_name(id),
                        attribute: attribute.name.clone(),
                    });
                }
            }
        }

        log::debug!("Domain model built with {} types", model.len());
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_model() -> (DomainModel, DomainTypeId, DomainTypeId, DomainTypeId) {
        let mut builder = DomainModelBuilder::new();
        let long = builder.basic(BasicKind::Long);
        let string = builder.basic(BasicKind::String);
        let base = builder.declare_mapped_supertype("Versioned").unwrap();
        let node = builder.declare_entity("Node", false).unwrap();
        let special = builder.declare_entity("SpecialNode", false).unwrap();
        builder
            .add_attribute(base, SqmAttribute::singular("version", long))
            .unwrap();
        builder.set_supertype(node, base).unwrap();
        builder.set_supertype(special, node).unwrap();
        builder
            .add_attribute(node, SqmAttribute::singular("id", long))
            .unwrap();
        builder
            .add_attribute(special, SqmAttribute::singular("specialAttribute", string))
            .unwrap();
        (builder.build().unwrap(), base, node, special)
    }

    #[test]
    fn test_inherited_attribute_lookup() {
        let (model, base, node, special) = node_model();

        let (declaring, attribute) = model.find_attribute(special, "version").unwrap();
        assert_eq!(declaring, base);
        assert_eq!(attribute.name, "version");

        assert!(model.find_attribute(special, "specialAttribute").is_some());
        assert!(model.find_attribute(node, "specialAttribute").is_none());
    }

    #[test]
    fn test_attributes_inherited_first() {
        let (model, _, _, special) = node_model();
        let names: Vec<&str> = model
            .attributes(special)
            .into_iter()
            .map(|(_, attribute)| attribute.name.as_str())
            .collect();
        assert_eq!(names, vec!["version", "id", "specialAttribute"]);
    }

    #[test]
    fn test_subtype_relation() {
        let (model, base, node, special) = node_model();
        assert!(model.is_subtype_of(special, node));
        assert!(model.is_subtype_of(special, base));
        assert!(model.is_subtype_of(node, node));
        assert!(!model.is_subtype_of(node, special));
        assert_eq!(model.direct_subtypes(node), vec![special]);
    }

    #[test]
    fn test_duplicate_declared_attribute_rejected() {
        let mut builder = DomainModelBuilder::new();
        let long = builder.basic(BasicKind::Long);
        let entity = builder.declare_entity("Bid", false).unwrap();
        builder
            .add_attribute(entity, SqmAttribute::singular("id", long))
            .unwrap();
        let err = builder
            .add_attribute(entity, SqmAttribute::singular("id", long))
            .unwrap_err();
        assert_eq!(
            err,
            DomainModelError::DuplicateAttribute {
                owner: "Bid".to_string(),
                attribute: "id".to_string()
            }
        );
    }

    #[test]
    fn test_inherited_name_clash_rejected() {
        let mut builder = DomainModelBuilder::new();
        let long = builder.basic(BasicKind::Long);
        let parent = builder.declare_entity("Parent", false).unwrap();
        let child = builder.declare_entity("Child", false).unwrap();
        builder.set_supertype(child, parent).unwrap();
        builder
            .add_attribute(parent, SqmAttribute::singular("id", long))
            .unwrap();
        builder
            .add_attribute(child, SqmAttribute::singular("id", long))
            .unwrap();
        assert!(matches!(
            builder.build(),
            Err(DomainModelError::DuplicateAttribute { .. })
        ));
    }

    #[test]
    fn test_supertype_cycle_rejected() {
        let mut builder = DomainModelBuilder::new();
        let a = builder.declare_entity("A", false).unwrap();
        let b = builder.declare_entity("B", false).unwrap();
        builder.set_supertype(a, b).unwrap();
        builder.set_supertype(b, a).unwrap();
        assert!(matches!(
            builder.build(),
            Err(DomainModelError::SupertypeCycle { .. })
        ));
    }

    #[test]
    fn test_embeddable_cannot_be_supertype() {
        let mut builder = DomainModelBuilder::new();
        let money = builder.declare_embeddable("Money").unwrap();
        let bid = builder.declare_entity("Bid", false).unwrap();
        assert!(matches!(
            builder.set_supertype(bid, money),
            Err(DomainModelError::InvalidSupertype { .. })
        ));
    }

    #[test]
    fn test_indexed_collection_requires_index_type() {
        let mut builder = DomainModelBuilder::new();
        let string = builder.basic(BasicKind::String);
        let auction = builder.declare_entity("Auction", false).unwrap();
        let err = builder
            .add_attribute(
                auction,
                SqmAttribute::plural("tags", string, CollectionClassification::List, None),
            )
            .unwrap_err();
        assert!(matches!(err, DomainModelError::MissingIndexType { .. }));
    }

    #[test]
    fn test_basic_and_any_types_are_interned() {
        let mut builder = DomainModelBuilder::new();
        let first = builder.basic(BasicKind::Decimal);
        let second = builder.basic(BasicKind::Decimal);
        assert_eq!(first, second);
        let any = builder.any(BasicKind::String, BasicKind::Long);
        assert_eq!(builder.any(BasicKind::String, BasicKind::Long), any);
        let model = builder.build().unwrap();
        assert!(model.basic_type_id(BasicKind::Long).is_some());
        assert!(model.basic_type_id(BasicKind::String).is_some());
    }
}
