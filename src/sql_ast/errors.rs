//! Errors raised while materializing table groups.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum FromClauseError {
    #[error("A table group is already registered for `{path}`")]
    DuplicateTableGroup { path: String },

    #[error("No table group for `{path}`")]
    MissingTableGroup { path: String },

    #[error("Cannot join `{path}`: {reason}")]
    UnresolvedJoin { path: String, reason: String },
}
