//! Physical mapping model.
//!
//! Describes how domain types are stored: entity descriptors with their tables,
//! identifier and discriminator columns, embeddable usages, associations and
//! plural attributes with their collection parts. Built once by the catalog
//! loader and shared read-only.
//!
//! # Key Components
//!
//! - [`MappingMetamodel`] - entity descriptor lookup by entity name
//! - [`ModelPart`] - `Copy` handle to one physical descriptor
//! - [`ModelPartContainer`] - attribute lookup on container descriptors
//! - [`basic_type`] - shared JDBC-level basic types

pub mod basic_type;
pub mod errors;
pub mod metamodel;
pub mod model_part;

pub use basic_type::{basic_type, BasicType};
pub use errors::MappingModelError;
pub use metamodel::{MappingMetamodel, MappingMetamodelBuilder};
pub use model_part::{
    AnyAttributeMapping, AttributeMapping, BasicValuedMapping, CollectionPartMapping,
    CollectionPartNature, CollectionValueMapping, DiscriminatorMapping, EmbeddableId,
    EmbeddableMappingType, EmbeddedAttributeMapping, EntityId, EntityMappingType, ModelPart,
    ModelPartContainer, PluralAttributeMapping, ToOneAttributeMapping, DISCRIMINATOR_ROLE_NAME,
    ID_ROLE_NAME, KEY_ROLE_NAME,
};
