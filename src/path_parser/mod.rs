//! Path expression parser.
//!
//! Parses the path fragment of a query, the part after `select`/`where`
//! that navigates from an identification variable:
//!
//! ```text
//! path     := primary ( '.' identifier )*
//! primary  := treat | plural | identifier
//! treat    := 'treat' '(' path 'as' identifier ')'
//! plural   := ( 'element' | 'value' | 'index' | 'key' ) '(' path ')'
//! ```
//!
//! Keywords are case-insensitive. A keyword not followed by `(` is an ordinary
//! identifier, so `key.value` parses as alias `key`, attribute `value`.
//!
//! The [`PathBinder`] turns a parsed [`PathExpr`] into an
//! [`SqmPath`](crate::sqm::SqmPath) against registered roots.

pub mod ast;
mod binder;
mod common;
pub mod errors;

pub use ast::{PathExpr, PluralFunction};
pub use binder::PathBinder;
pub use errors::{BindError, PathParseError};

use common::{identifier, ws};
use errors::PathParsingError;
use nom::branch::alt;
use nom::bytes::complete::tag_no_case;
use nom::character::complete::{char, multispace0, multispace1};
use nom::combinator::{cut, map, value};
use nom::error::context;
use nom::multi::many0;
use nom::sequence::preceded;
use nom::{IResult, Parser};

/// Most navigation steps (`.` and `(`) one expression may contain. Parsing
/// and binding recurse once per step.
pub const MAX_PATH_STEPS: usize = 256;

/// Parse a complete path expression; surrounding whitespace is ignored
pub fn parse_path_expression(input: &str) -> Result<PathExpr<'_>, PathParseError> {
    if input.trim().is_empty() {
        return Err(PathParseError::Empty);
    }
    let steps = input.bytes().filter(|b| matches!(b, b'.' | b'(')).count();
    if steps > MAX_PATH_STEPS {
        return Err(PathParseError::TooDeep {
            limit: MAX_PATH_STEPS,
        });
    }
    match parse_path(input) {
        Ok((remainder, expr)) => {
            let remainder = remainder.trim_start();
            if !remainder.is_empty() {
                return Err(PathParseError::TrailingInput {
                    position: input.len() - remainder.len(),
                    remaining: remainder.to_string(),
                });
            }
            Ok(expr)
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            Err(PathParseError::from_parsing_error(input, e))
        }
        Err(nom::Err::Incomplete(_)) => Err(PathParseError::Empty),
    }
}

fn parse_path(input: &str) -> IResult<&str, PathExpr<'_>, PathParsingError<'_>> {
    let (input, base) = ws(parse_primary).parse(input)?;
    let (input, names) = many0(preceded(
        ws(char('.')),
        context("attribute name", cut(identifier)),
    ))
    .parse(input)?;

    let expr = names
        .into_iter()
        .fold(base, |base, name| PathExpr::Attribute {
            base: Box::new(base),
            name,
        });
    Ok((input, expr))
}

fn parse_primary(input: &str) -> IResult<&str, PathExpr<'_>, PathParsingError<'_>> {
    alt((parse_treat, parse_plural_part, map(identifier, PathExpr::Alias))).parse(input)
}

fn parse_treat(input: &str) -> IResult<&str, PathExpr<'_>, PathParsingError<'_>> {
    let (input, _) = tag_no_case("treat").parse(input)?;
    let (input, _) = ws(char('(')).parse(input)?;

    let (input, base) = context("treat", cut(parse_path)).parse(input)?;
    let (input, _) =
        context("treat", cut(preceded(multispace0, tag_no_case("as")))).parse(input)?;
    let (input, _) = context("treat", cut(multispace1)).parse(input)?;
    let (input, target) = context("treat target", cut(ws(identifier))).parse(input)?;
    let (input, _) = context("closing parenthesis", cut(ws(char(')')))).parse(input)?;

    Ok((
        input,
        PathExpr::Treat {
            base: Box::new(base),
            target,
        },
    ))
}

fn parse_plural_part(input: &str) -> IResult<&str, PathExpr<'_>, PathParsingError<'_>> {
    let (input, function) = alt((
        value(PluralFunction::Element, tag_no_case("element")),
        value(PluralFunction::Value, tag_no_case("value")),
        value(PluralFunction::Index, tag_no_case("index")),
        value(PluralFunction::Key, tag_no_case("key")),
    ))
    .parse(input)?;
    let (input, _) = ws(char('(')).parse(input)?;

    let (input, base) = context(function.as_str(), cut(parse_path)).parse(input)?;
    let (input, _) = context("closing parenthesis", cut(ws(char(')')))).parse(input)?;

    Ok((
        input,
        PathExpr::PluralPart {
            function,
            base: Box::new(base),
        },
    ))
}
