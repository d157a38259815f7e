//! Physical mapping model lookup errors.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum MappingModelError {
    #[error("No entity descriptor registered for `{entity_name}`")]
    UnknownEntity { entity_name: String },

    #[error("Entity descriptor `{entity_name}` is registered twice")]
    DuplicateEntity { entity_name: String },

    #[error("Attribute mapping `{attribute}` is registered twice on `{owner}`")]
    DuplicateAttribute { owner: String, attribute: String },
}
