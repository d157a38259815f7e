//! Path source construction errors.
//!
//! These are fatal: they mean the domain model handed to the registry is
//! malformed or contains a type that cannot be navigated.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PathSourceError {
    #[error("Unrecognized domain type `{type_name}` for path source `{name}`")]
    UnrecognizedDomainType { name: String, type_name: String },

    #[error("`{type_name}` is not an entity and cannot be used as a query root")]
    NotQueryRoot { type_name: String },

    #[error("No managed type named `{type_name}`")]
    UnknownType { type_name: String },
}
