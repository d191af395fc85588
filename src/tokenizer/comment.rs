//! # Comment Handling
//!
//! Strict JSON has no comments, but configuration-style documents frequently
//! carry them. When [`TokenizerConfig::allow_comments`] is set the tokenizer
//! accepts both forms and drops them before the structural pass:
//!
//! * **Line Comments**: `// Comment text`
//! * **Block Comments**: `/* Comment text */`
//!
//! [`TokenizerConfig::allow_comments`]: crate::config::TokenizerConfig::allow_comments

use nom::{
    branch::alt,
    bytes::complete::{tag, take_until},
    character::complete::not_line_ending,
    combinator::map,
    error::context,
    sequence::{delimited, preceded},
};

use super::token::{Lexeme, ParserResult};

/// Parses a line comment, up to but not including the line ending.
#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_line_comment(input: &str) -> ParserResult<Lexeme> {
    context(
        "line comment",
        map(preceded(tag("//"), not_line_ending), |content: &str| {
            Lexeme::Comment(content.trim().to_string())
        }),
    )(input)
}

/// Parses a block comment. Block comments do not nest.
#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_block_comment(input: &str) -> ParserResult<Lexeme> {
    context(
        "block comment",
        map(
            delimited(tag("/*"), take_until("*/"), tag("*/")),
            |content: &str| Lexeme::Comment(content.to_string()),
        ),
    )(input)
}

#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_comment(input: &str) -> ParserResult<Lexeme> {
    context("comment", alt((parse_block_comment, parse_line_comment)))(input)
}
