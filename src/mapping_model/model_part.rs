//! Physical model parts.
//!
//! The owned mapping structs in this module live inside a
//! [`MappingMetamodel`]. Resolution hands out [`ModelPart`] handles, which are
//! `Copy` references into that metamodel. Cross references (to-one targets,
//! entity-valued collection elements, embeddables) are stored as ids and
//! followed through the metamodel, so the descriptor graph can be cyclic without
//! shared ownership.

use std::fmt;

use indexmap::IndexMap;

use super::basic_type::{basic_type, BasicType};
use super::metamodel::MappingMetamodel;
use crate::domain_model::{BasicKind, CollectionClassification};

/// Reserved sub-part name of an entity's identifier
pub const ID_ROLE_NAME: &str = "{id}";
/// Reserved sub-part names of a discriminated association
pub const DISCRIMINATOR_ROLE_NAME: &str = "{discriminator}";
pub const KEY_ROLE_NAME: &str = "{key}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub(crate) u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EmbeddableId(pub(crate) u32);

/// Which sub-accessor of a collection a part denotes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionPartNature {
    Element,
    /// List position or map key
    Index,
    /// Surrogate id of an id-bag row
    Id,
}

impl CollectionPartNature {
    pub fn name(self) -> &'static str {
        match self {
            CollectionPartNature::Element => "{element}",
            CollectionPartNature::Index => "{index}",
            CollectionPartNature::Id => "{collection-id}",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "{element}" => Some(CollectionPartNature::Element),
            "{index}" => Some(CollectionPartNature::Index),
            "{collection-id}" => Some(CollectionPartNature::Id),
            _ => None,
        }
    }
}

impl fmt::Display for CollectionPartNature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Owned mappings
// ============================================================================

/// A single column-backed value
#[derive(Debug, Clone, PartialEq)]
pub struct BasicValuedMapping {
    pub selectable_name: String,
    pub table_expression: String,
    pub column: String,
    pub jdbc_kind: BasicKind,
}

impl BasicValuedMapping {
    pub fn new(
        selectable_name: impl Into<String>,
        table_expression: impl Into<String>,
        column: impl Into<String>,
        jdbc_kind: BasicKind,
    ) -> Self {
        BasicValuedMapping {
            selectable_name: selectable_name.into(),
            table_expression: table_expression.into(),
            column: column.into(),
            jdbc_kind,
        }
    }

    pub fn jdbc_mapping(&self) -> &'static BasicType {
        basic_type(self.jdbc_kind)
    }
}

/// One usage of an embeddable. Each embedded attribute gets its own descriptor
/// because column names differ per usage.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddableMappingType {
    pub(crate) id: EmbeddableId,
    /// Navigable role, e.g. `Auction.reserve`
    pub role: String,
    pub embeddable_name: String,
    pub table_expression: String,
    pub attributes: IndexMap<String, AttributeMapping>,
}

impl EmbeddableMappingType {
    pub fn id(&self) -> EmbeddableId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedAttributeMapping {
    pub name: String,
    pub embeddable: EmbeddableId,
}

/// Many-to-one / one-to-one association
#[derive(Debug, Clone, PartialEq)]
pub struct ToOneAttributeMapping {
    pub name: String,
    pub target: EntityId,
    pub target_entity_name: String,
    pub table_expression: String,
    pub fk_column: String,
}

/// Discriminated ("any") association: a discriminator column naming the target
/// entity plus a key column holding its identifier
#[derive(Debug, Clone, PartialEq)]
pub struct AnyAttributeMapping {
    pub name: String,
    pub discriminator: BasicValuedMapping,
    pub key: BasicValuedMapping,
    /// Discriminator value to entity name
    pub discriminator_values: Vec<(String, String)>,
}

impl AnyAttributeMapping {
    pub fn entity_for_discriminator(&self, value: &str) -> Option<&str> {
        self.discriminator_values
            .iter()
            .find(|(candidate, _)| candidate == value)
            .map(|(_, entity_name)| entity_name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CollectionValueMapping {
    Basic(BasicValuedMapping),
    Embedded(EmbeddableId),
    Entity {
        target: EntityId,
        target_entity_name: String,
        fk_column: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectionPartMapping {
    pub nature: CollectionPartNature,
    /// Role of the owning collection, e.g. `Auction.bids`
    pub collection_role: String,
    pub value: CollectionValueMapping,
}

impl CollectionPartMapping {
    /// For entity-valued parts, the descriptor of the associated entity
    pub fn associated_entity_mapping_type<'m>(
        &self,
        metamodel: &'m MappingMetamodel,
    ) -> Option<&'m EntityMappingType> {
        match &self.value {
            CollectionValueMapping::Entity { target, .. } => Some(metamodel.entity(*target)),
            CollectionValueMapping::Basic(_) | CollectionValueMapping::Embedded(_) => None,
        }
    }

    pub fn is_entity_valued(&self) -> bool {
        matches!(self.value, CollectionValueMapping::Entity { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PluralAttributeMapping {
    pub name: String,
    pub role: String,
    pub classification: CollectionClassification,
    /// Join table; `None` for one-to-many collections keyed on the element table
    pub collection_table: Option<String>,
    pub key_column: String,
    pub element: CollectionPartMapping,
    pub index: Option<CollectionPartMapping>,
    pub identifier: Option<CollectionPartMapping>,
}

impl PluralAttributeMapping {
    pub fn collection_part(&self, nature: CollectionPartNature) -> Option<&CollectionPartMapping> {
        match nature {
            CollectionPartNature::Element => Some(&self.element),
            CollectionPartNature::Index => self.index.as_ref(),
            CollectionPartNature::Id => self.identifier.as_ref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeMapping {
    Basic(BasicValuedMapping),
    Embedded(EmbeddedAttributeMapping),
    ToOne(ToOneAttributeMapping),
    Plural(PluralAttributeMapping),
    Any(AnyAttributeMapping),
}

impl AttributeMapping {
    pub fn name(&self) -> &str {
        match self {
            AttributeMapping::Basic(basic) => &basic.selectable_name,
            AttributeMapping::Embedded(embedded) => &embedded.name,
            AttributeMapping::ToOne(to_one) => &to_one.name,
            AttributeMapping::Plural(plural) => &plural.name,
            AttributeMapping::Any(any) => &any.name,
        }
    }

    pub fn as_model_part<'m>(&'m self, metamodel: &'m MappingMetamodel) -> ModelPart<'m> {
        match self {
            AttributeMapping::Basic(basic) => ModelPart::Basic(basic),
            AttributeMapping::Embedded(embedded) => {
                ModelPart::Embeddable(metamodel.embeddable(embedded.embeddable))
            }
            AttributeMapping::ToOne(to_one) => ModelPart::EntityValued(to_one),
            AttributeMapping::Plural(plural) => ModelPart::Plural(plural),
            AttributeMapping::Any(any) => ModelPart::Any(any),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiscriminatorMapping {
    pub column: String,
    pub kind: BasicKind,
    /// Value identifying rows of this entity; `None` for abstract entities
    pub value: Option<String>,
}

/// Entity descriptor ("persister")
#[derive(Debug, Clone, PartialEq)]
pub struct EntityMappingType {
    pub(crate) id: EntityId,
    pub entity_name: String,
    pub table_name: String,
    pub identifier_name: Option<String>,
    pub discriminator: Option<DiscriminatorMapping>,
    pub(crate) supertype: Option<EntityId>,
    pub(crate) subtypes: Vec<EntityId>,
    /// Declared attributes, including those flattened in from mapped supertypes
    pub attributes: IndexMap<String, AttributeMapping>,
}

impl EntityMappingType {
    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn supertype<'m>(&self, metamodel: &'m MappingMetamodel) -> Option<&'m EntityMappingType> {
        self.supertype.map(|id| metamodel.entity(id))
    }

    pub fn subtypes<'m>(
        &self,
        metamodel: &'m MappingMetamodel,
    ) -> impl Iterator<Item = &'m EntityMappingType> + 'm {
        let subtypes = self.subtypes.clone();
        subtypes.into_iter().map(move |id| metamodel.entity(id))
    }

    pub fn identifier_mapping(&self) -> Option<&BasicValuedMapping> {
        let name = self.identifier_name.as_ref()?;
        match self.attributes.get(name) {
            Some(AttributeMapping::Basic(basic)) => Some(basic),
            _ => None,
        }
    }

    fn find_declared_or_inherited<'m>(
        &'m self,
        name: &str,
        stop_at: Option<EntityId>,
        metamodel: &'m MappingMetamodel,
    ) -> Option<ModelPart<'m>> {
        let mut current = Some(self);
        while let Some(entity) = current {
            if let Some(attribute) = entity.attributes.get(name) {
                return Some(attribute.as_model_part(metamodel));
            }
            if name == ID_ROLE_NAME {
                if let Some(identifier) = entity.identifier_mapping() {
                    return Some(ModelPart::Basic(identifier));
                }
            }
            if stop_at == Some(entity.id) {
                break;
            }
            current = entity.supertype(metamodel);
        }
        None
    }
}

// ============================================================================
// Handles
// ============================================================================

/// Physical descriptor of one navigation step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModelPart<'m> {
    Basic(&'m BasicValuedMapping),
    Embeddable(&'m EmbeddableMappingType),
    Entity(&'m EntityMappingType),
    EntityValued(&'m ToOneAttributeMapping),
    Plural(&'m PluralAttributeMapping),
    Collection(&'m CollectionPartMapping),
    Any(&'m AnyAttributeMapping),
}

impl<'m> ModelPart<'m> {
    pub fn part_name(&self) -> &'m str {
        match *self {
            ModelPart::Basic(basic) => &basic.selectable_name,
            ModelPart::Embeddable(embeddable) => &embeddable.role,
            ModelPart::Entity(entity) => &entity.entity_name,
            ModelPart::EntityValued(to_one) => &to_one.name,
            ModelPart::Plural(plural) => &plural.name,
            ModelPart::Collection(part) => part.nature.name(),
            ModelPart::Any(any) => &any.name,
        }
    }

    /// Whether `find_sub_part` can ever return something
    pub fn is_container(&self) -> bool {
        match *self {
            ModelPart::Basic(_) => false,
            ModelPart::Collection(part) => !matches!(part.value, CollectionValueMapping::Basic(_)),
            _ => true,
        }
    }

    /// Resolve a sub-part by name, treating this part as a container
    pub fn find_sub_part(
        self,
        name: &str,
        treat_target: Option<&'m EntityMappingType>,
        metamodel: &'m MappingMetamodel,
    ) -> Option<ModelPart<'m>> {
        match self {
            ModelPart::Basic(_) => None,
            ModelPart::Embeddable(embeddable) => {
                embeddable.find_sub_part(name, treat_target, metamodel)
            }
            ModelPart::Entity(entity) => entity.find_sub_part(name, treat_target, metamodel),
            ModelPart::EntityValued(to_one) => to_one.find_sub_part(name, treat_target, metamodel),
            ModelPart::Plural(plural) => plural.find_sub_part(name, treat_target, metamodel),
            ModelPart::Collection(part) => part.find_sub_part(name, treat_target, metamodel),
            ModelPart::Any(any) => any.find_sub_part(name, treat_target, metamodel),
        }
    }

    /// The entity descriptor this part stands for, if it is entity-valued
    pub fn entity_mapping_type(
        &self,
        metamodel: &'m MappingMetamodel,
    ) -> Option<&'m EntityMappingType> {
        match *self {
            ModelPart::Entity(entity) => Some(entity),
            ModelPart::EntityValued(to_one) => Some(metamodel.entity(to_one.target)),
            ModelPart::Collection(part) => part.associated_entity_mapping_type(metamodel),
            ModelPart::Plural(plural) => plural.element.associated_entity_mapping_type(metamodel),
            ModelPart::Basic(_) | ModelPart::Embeddable(_) | ModelPart::Any(_) => None,
        }
    }

    /// Table a join over this part would read from
    pub fn table_expression(&self, metamodel: &'m MappingMetamodel) -> &'m str {
        match *self {
            ModelPart::Basic(basic) => &basic.table_expression,
            ModelPart::Embeddable(embeddable) => &embeddable.table_expression,
            ModelPart::Entity(entity) => &entity.table_name,
            ModelPart::EntityValued(to_one) => &metamodel.entity(to_one.target).table_name,
            ModelPart::Plural(plural) => match &plural.collection_table {
                Some(table) => table,
                None => ModelPart::Collection(&plural.element).table_expression(metamodel),
            },
            ModelPart::Collection(part) => match &part.value {
                CollectionValueMapping::Basic(basic) => &basic.table_expression,
                CollectionValueMapping::Embedded(id) => &metamodel.embeddable(*id).table_expression,
                CollectionValueMapping::Entity { target, .. } => {
                    &metamodel.entity(*target).table_name
                }
            },
            ModelPart::Any(any) => &any.key.table_expression,
        }
    }

    /// JDBC type of a column-backed part
    pub fn jdbc_mapping(&self) -> Option<&'static BasicType> {
        match *self {
            ModelPart::Basic(basic) => Some(basic.jdbc_mapping()),
            ModelPart::Collection(CollectionPartMapping {
                value: CollectionValueMapping::Basic(basic),
                ..
            }) => Some(basic.jdbc_mapping()),
            _ => None,
        }
    }
}

impl fmt::Display for ModelPart<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelPart::Basic(basic) => write!(
                f,
                "basic({} -> {}.{} : {})",
                basic.selectable_name, basic.table_expression, basic.column, basic.jdbc_kind
            ),
            ModelPart::Embeddable(embeddable) => {
                write!(f, "embeddable({} : {})", embeddable.role, embeddable.embeddable_name)
            }
            ModelPart::Entity(entity) => {
                write!(f, "entity({} -> {})", entity.entity_name, entity.table_name)
            }
            ModelPart::EntityValued(to_one) => write!(
                f,
                "to-one({} -> {} via {})",
                to_one.name, to_one.target_entity_name, to_one.fk_column
            ),
            ModelPart::Plural(plural) => {
                write!(f, "plural({} : {:?})", plural.role, plural.classification)
            }
            ModelPart::Collection(part) => write!(f, "collection-part({}.{})", part.collection_role, part.nature),
            ModelPart::Any(any) => write!(
                f,
                "any({} -> {}/{})",
                any.name, any.discriminator.column, any.key.column
            ),
        }
    }
}

// ============================================================================
// Containers
// ============================================================================

/// Physical-side attribute lookup.
///
/// `treat_target` narrows an entity container to a subtype so subtype-only
/// attributes become visible; containers that are not entity-valued ignore it.
pub trait ModelPartContainer {
    fn find_sub_part<'m>(
        &'m self,
        name: &str,
        treat_target: Option<&'m EntityMappingType>,
        metamodel: &'m MappingMetamodel,
    ) -> Option<ModelPart<'m>>;
}

impl ModelPartContainer for EntityMappingType {
    fn find_sub_part<'m>(
        &'m self,
        name: &str,
        treat_target: Option<&'m EntityMappingType>,
        metamodel: &'m MappingMetamodel,
    ) -> Option<ModelPart<'m>> {
        if let Some(part) = self.find_declared_or_inherited(name, None, metamodel) {
            return Some(part);
        }

        // Only the treat target's own branch is searched, never its siblings
        let subtype = treat_target.filter(|target| {
            target.id != self.id && metamodel.is_subtype(target, self)
        })?;
        subtype.find_declared_or_inherited(name, Some(self.id), metamodel)
    }
}

impl ModelPartContainer for EmbeddableMappingType {
    fn find_sub_part<'m>(
        &'m self,
        name: &str,
        _treat_target: Option<&'m EntityMappingType>,
        metamodel: &'m MappingMetamodel,
    ) -> Option<ModelPart<'m>> {
        self.attributes
            .get(name)
            .map(|attribute| attribute.as_model_part(metamodel))
    }
}

impl ModelPartContainer for ToOneAttributeMapping {
    fn find_sub_part<'m>(
        &'m self,
        name: &str,
        treat_target: Option<&'m EntityMappingType>,
        metamodel: &'m MappingMetamodel,
    ) -> Option<ModelPart<'m>> {
        metamodel
            .entity(self.target)
            .find_sub_part(name, treat_target, metamodel)
    }
}

impl ModelPartContainer for CollectionPartMapping {
    fn find_sub_part<'m>(
        &'m self,
        name: &str,
        treat_target: Option<&'m EntityMappingType>,
        metamodel: &'m MappingMetamodel,
    ) -> Option<ModelPart<'m>> {
        match &self.value {
            CollectionValueMapping::Basic(_) => None,
            CollectionValueMapping::Embedded(id) => {
                metamodel
                    .embeddable(*id)
                    .find_sub_part(name, treat_target, metamodel)
            }
            CollectionValueMapping::Entity { target, .. } => {
                metamodel
                    .entity(*target)
                    .find_sub_part(name, treat_target, metamodel)
            }
        }
    }
}

impl ModelPartContainer for PluralAttributeMapping {
    fn find_sub_part<'m>(
        &'m self,
        name: &str,
        treat_target: Option<&'m EntityMappingType>,
        metamodel: &'m MappingMetamodel,
    ) -> Option<ModelPart<'m>> {
        if let Some(nature) = CollectionPartNature::from_name(name) {
            return self.collection_part(nature).map(ModelPart::Collection);
        }
        // implicit element dereference: `a.bids.amount`
        self.element.find_sub_part(name, treat_target, metamodel)
    }
}

impl ModelPartContainer for AnyAttributeMapping {
    fn find_sub_part<'m>(
        &'m self,
        name: &str,
        _treat_target: Option<&'m EntityMappingType>,
        _metamodel: &'m MappingMetamodel,
    ) -> Option<ModelPart<'m>> {
        match name {
            DISCRIMINATOR_ROLE_NAME => Some(ModelPart::Basic(&self.discriminator)),
            KEY_ROLE_NAME | "id" => Some(ModelPart::Basic(&self.key)),
            _ => None,
        }
    }
}
