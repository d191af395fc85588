use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    combinator::{map, value},
    error::context,
};

use super::token::{Lexeme, ParserResult};

/// Spaces and tabs. Line breaks are handled by [`parse_newline`] so spans
/// can track line numbers.
#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_whitespace(input: &str) -> ParserResult<Lexeme> {
    context(
        "whitespace",
        map(take_while1(|c: char| c == ' ' || c == '\t'), |_| {
            Lexeme::Whitespace
        }),
    )(input)
}

#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_newline(input: &str) -> ParserResult<Lexeme> {
    context(
        "newline",
        value(Lexeme::Newline, alt((tag("\r\n"), tag("\n"), tag("\r")))),
    )(input)
}
