//! Errors raised while building query paths.

use thiserror::Error;

use crate::path_source::PathSourceError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SqmPathError {
    #[error("Could not resolve attribute `{name}` of `{path}`")]
    UnknownAttribute { path: String, name: String },

    #[error("`{path}` is not a plural attribute")]
    NotPlural { path: String },

    #[error("Plural attribute `{path}` has no index or key")]
    NotIndexed { path: String },

    #[error("Plural attribute `{path}` has no collection id")]
    NoCollectionId { path: String },

    #[error("No managed type named `{type_name}` to treat as")]
    UnknownManagedType { type_name: String },

    #[error("`{path}` is a basic value and cannot be de-referenced")]
    NotNavigable { path: String },

    #[error("CTE `{cte}` has no column `{column}`")]
    UnknownCteColumn { cte: String, column: String },

    #[error(transparent)]
    PathSource(#[from] PathSourceError),
}
