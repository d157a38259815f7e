//! Errors raised by the resolver when a caller asks for a hard result.
//!
//! Plain resolution never fails: an unanchored path resolves to `None`.

use thiserror::Error;

use crate::mapping_model::MappingModelError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ResolutionError {
    #[error("Could not resolve `{path}` to a physical model part")]
    UnresolvedPath { path: String },

    #[error("Invalid treat target `{target}` for `{path}`: {reason}")]
    InvalidTreatTarget {
        path: String,
        target: String,
        reason: String,
    },

    #[error(transparent)]
    MappingModel(#[from] MappingModelError),
}
