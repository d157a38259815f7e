use nom::error::{ContextError, ParseError};
use std::fmt;
use thiserror::Error;

use crate::sqm::SqmPathError;

/// Error type threaded through the nom parsers
#[derive(Debug, PartialEq)]
pub struct PathParsingError<'a> {
    pub errors: Vec<(&'a str, &'static str)>,
}

impl<'a> ParseError<&'a str> for PathParsingError<'a> {
    fn from_error_kind(input: &'a str, _kind: nom::error::ErrorKind) -> Self {
        PathParsingError {
            errors: vec![(input, "unexpected input")],
        }
    }

    fn append(_input: &'a str, _kind: nom::error::ErrorKind, other: Self) -> Self {
        other
    }
}

impl<'a> ContextError<&'a str> for PathParsingError<'a> {
    fn add_context(input: &'a str, ctx: &'static str, mut other: Self) -> Self {
        other.errors.push((input, ctx));
        other
    }
}

impl fmt::Display for PathParsingError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (input, ctx) in &self.errors {
            writeln!(f, "{}: {}", ctx, input)?;
        }
        Ok(())
    }
}

impl<'a> From<nom::error::Error<&'a str>> for PathParsingError<'a> {
    fn from(err: nom::error::Error<&'a str>) -> Self {
        PathParsingError {
            errors: vec![(err.input, "Unable to parse")],
        }
    }
}

/// Owned parse failure returned by [`parse_path_expression`](super::parse_path_expression)
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PathParseError {
    #[error("Empty path expression")]
    Empty,

    #[error("Invalid path expression at offset {position} ({context}): `{near}`")]
    Syntax {
        position: usize,
        context: &'static str,
        near: String,
    },

    #[error("Path expression has more than {limit} navigation steps")]
    TooDeep { limit: usize },

    #[error("Unexpected input at offset {position}: `{remaining}`")]
    TrailingInput { position: usize, remaining: String },
}

impl PathParseError {
    pub(crate) fn from_parsing_error(source: &str, err: PathParsingError<'_>) -> Self {
        let Some((innermost, _)) = err.errors.first() else {
            return PathParseError::Empty;
        };
        // The outermost context names the construct being parsed
        let context = err
            .errors
            .last()
            .map_or("unexpected input", |(_, ctx)| *ctx);
        PathParseError::Syntax {
            position: source.len() - innermost.len(),
            context,
            near: innermost.chars().take(24).collect(),
        }
    }
}

/// Failure binding a parsed path to query roots
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BindError {
    #[error(transparent)]
    Parse(#[from] PathParseError),

    #[error("Unknown identification variable `{alias}`")]
    UnknownAlias { alias: String },

    #[error("Identification variable `{alias}` is already defined")]
    DuplicateAlias { alias: String },

    #[error("`{expression}` cannot be joined; expected `alias.attribute`")]
    InvalidJoin { expression: String },

    #[error(transparent)]
    Path(#[from] SqmPathError),
}
