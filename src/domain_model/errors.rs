//! Error types raised while assembling the logical domain model.
//!
//! All of these are construction-time failures: a model that trips one of them
//! is malformed and is never published to query compilation.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum DomainModelError {
    #[error("Attribute `{attribute}` is declared more than once on `{owner}`")]
    DuplicateAttribute { owner: String, attribute: String },

    #[error("No domain type named `{type_name}`")]
    UnknownType { type_name: String },

    #[error("A managed type named `{type_name}` is already registered")]
    DuplicateType { type_name: String },

    #[error("`{supertype}` cannot be the supertype of `{type_name}`: only entities and mapped supertypes can be extended")]
    InvalidSupertype {
        type_name: String,
        supertype: String,
    },

    #[error("Supertype chain of `{type_name}` is cyclic")]
    SupertypeCycle { type_name: String },

    #[error("Plural attribute `{owner}.{attribute}` is indexed but declares no index type")]
    MissingIndexType { owner: String, attribute: String },

    #[error("`{type_name}` is not a managed type and cannot declare attributes")]
    NotManaged { type_name: String },
}
