use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, multispace0},
    combinator::recognize,
    error::ParseError,
    multi::many0,
    sequence::{delimited, pair},
};

use super::errors::PathParsingError;

pub fn ws<'a, O, E: ParseError<&'a str>, F>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
{
    delimited(multispace0, inner, multispace0)
}

// a letter or underscore, then letters, digits and underscores.
// e.g. "a", "bids", "special_attribute", "_tmp1"
pub fn identifier(input: &str) -> IResult<&str, &str, PathParsingError<'_>> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))
    .parse(input)
}
