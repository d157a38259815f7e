//! Errors raised while loading a model definition.

use thiserror::Error;

use crate::domain_model::DomainModelError;
use crate::mapping_model::MappingModelError;
use crate::path_source::PathSourceError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    #[error("Failed to read model definition: {error}")]
    ConfigReadError { error: String },

    #[error("Failed to parse model definition: {error}")]
    ConfigParseError { error: String },

    #[error("Invalid model definition: {message}")]
    InvalidDefinition { message: String },

    #[error(transparent)]
    DomainModel(#[from] DomainModelError),

    #[error(transparent)]
    MappingModel(#[from] MappingModelError),

    #[error(transparent)]
    PathSource(#[from] PathSourceError),
}

impl CatalogError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        CatalogError::InvalidDefinition {
            message: message.into(),
        }
    }
}
