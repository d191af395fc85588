//! # Core Parser Definitions
//!
//! This module defines the fundamental parser interface and error types
//! that every combinator and primitive in the analyzer is built on.
//!
//! A parser borrows a [`Cursor`] for the duration of one call. On success it
//! leaves the cursor just past the tokens it consumed. On failure the cursor
//! position is whatever the parser left behind: restoring it is the job of
//! the combinator that asked for the attempt (see
//! [`Or`](super::combinators::Or) and [`Many`](super::combinators::Many)).

use std::sync::Arc;

use thiserror::Error;

use super::cursor::Cursor;
use crate::config::ParseConfig;
use crate::tokenizer::TokenKind;
use crate::{Error, InternalResult};

/// Parser trait defines the core parsing interface.
///
/// Parsers are immutable values. All per-call state lives in the cursor and
/// the config, so a single parser can be reused for any number of parses,
/// including concurrent ones on different cursors.
///
/// # Type Parameters
///
/// * `O` - The output value type
pub trait Parser<O> {
    /// Attempts to parse at the cursor's position.
    ///
    /// # Arguments
    ///
    /// * `cursor` - The token cursor, advanced past consumed tokens on success
    /// * `config` - Options passed through to primitives and the fallback deserializer
    ///
    /// # Returns
    ///
    /// * `Ok(output)` - If parsing succeeds
    /// * `Err(error)` - If parsing fails
    fn parse(&self, cursor: &mut Cursor<'_>, config: &ParseConfig) -> ParseResult<O>;
}

/// Result type for parsing operations.
///
/// `Ok` is the success case and `Err` the failure case; see
/// [`ResultExt`](super::result::ResultExt) for the eliminators.
pub type ParseResult<O> = Result<O, ParseError>;

/// A type-erased parser, used wherever parsers of different concrete types
/// have to be returned from one place, such as a property selector.
pub type BoxedParser<O> = Box<dyn Parser<O>>;

/// A type-erased parser that can be shared between threads.
pub type SharedParser<O> = Arc<dyn Parser<O> + Send + Sync>;

impl<O, P: Parser<O> + ?Sized> Parser<O> for Box<P> {
    fn parse(&self, cursor: &mut Cursor<'_>, config: &ParseConfig) -> ParseResult<O> {
        (**self).parse(cursor, config)
    }
}

impl<O, P: Parser<O> + ?Sized> Parser<O> for Arc<P> {
    fn parse(&self, cursor: &mut Cursor<'_>, config: &ParseConfig) -> ParseResult<O> {
        (**self).parse(cursor, config)
    }
}

impl<O, P: Parser<O> + ?Sized> Parser<O> for &P {
    fn parse(&self, cursor: &mut Cursor<'_>, config: &ParseConfig) -> ParseResult<O> {
        (**self).parse(cursor, config)
    }
}

/// Adapts a plain function or closure into a [`Parser`].
#[derive(Clone)]
pub struct FromFn<F> {
    f: F,
}

impl<F> FromFn<F> {
    pub fn new<O>(f: F) -> Self
    where
        F: Fn(&mut Cursor<'_>, &ParseConfig) -> ParseResult<O>,
    {
        Self { f }
    }
}

impl<O, F> Parser<O> for FromFn<F>
where
    F: Fn(&mut Cursor<'_>, &ParseConfig) -> ParseResult<O>,
{
    fn parse(&self, cursor: &mut Cursor<'_>, config: &ParseConfig) -> ParseResult<O> {
        (self.f)(cursor, config)
    }
}

/// Error type for parsing operations.
///
/// Positions are token indices: the number of tokens the cursor had consumed
/// when the failure was detected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The stream ended before the expected token.
    #[error("Unexpected end of token stream at position {position}")]
    EndOfStream { position: usize },

    /// The next token was not one of the expected kinds.
    #[error("Token mismatch: expected {expected}, found {found} at position {position}")]
    TokenMismatch {
        expected: String,
        found: TokenKind,
        position: usize,
    },

    /// The token kind matched but its payload could not be converted.
    #[error("Cannot convert {found} to {target} at position {position}")]
    Conversion {
        target: String,
        found: String,
        position: usize,
    },

    /// A value was read but is not one of the accepted values.
    #[error("Unexpected: expected {expected}, parsed {found} at position {position}")]
    Unexpected {
        expected: String,
        found: String,
        position: usize,
    },

    /// A value was read but rejected by a predicate.
    #[error("Predicate rejected value {found} at position {position}")]
    Predicate { found: String, position: usize },

    /// A property selector has no handler for this name.
    #[error("No handler for property \"{0}\"")]
    UnknownProperty(String),

    /// Parsing the value of a named object property failed.
    #[error("Property \"{name}\": {inner}")]
    Property {
        name: String,
        inner: Box<ParseError>,
    },

    /// Explicit failure
    #[error("Failure: {0}")]
    Fail(String),

    #[error("{message}: {inner}")]
    WithContext {
        message: String,
        inner: Box<ParseError>,
    },
}

impl ParseError {
    pub fn with_context(self, ctx: impl ToString) -> Self {
        ParseError::WithContext {
            message: ctx.to_string(),
            inner: Box::new(self),
        }
    }

    /// Re-types this failure as the result of a parser with a different
    /// output type.
    pub fn repack<U>(self) -> ParseResult<U> {
        Err(self)
    }

    /// Token position of the innermost failure, when it carries one.
    pub fn position(&self) -> Option<usize> {
        match self {
            ParseError::EndOfStream { position }
            | ParseError::TokenMismatch { position, .. }
            | ParseError::Conversion { position, .. }
            | ParseError::Unexpected { position, .. }
            | ParseError::Predicate { position, .. } => Some(*position),
            ParseError::Property { inner, .. } | ParseError::WithContext { inner, .. } => {
                inner.position()
            }
            ParseError::UnknownProperty(_) | ParseError::Fail(_) => None,
        }
    }

    /// Name of the object property the failure occurred in, if any.
    pub fn property(&self) -> Option<&str> {
        match self {
            ParseError::Property { name, .. } => Some(name),
            ParseError::WithContext { inner, .. } => inner.property(),
            _ => None,
        }
    }
}

/// Runs `parser` and converts a failure into a fatal [`Error`] that carries
/// the source location of the token where parsing stopped.
#[tracing::instrument(level = "debug", skip_all)]
pub fn parse<O, P>(parser: &P, cursor: &mut Cursor<'_>, config: &ParseConfig) -> InternalResult<O>
where
    P: Parser<O> + ?Sized,
{
    parser.parse(cursor, config).map_err(|source| {
        let (line, column) = cursor.location();
        tracing::debug!(
            target: "parser::parse",
            error = %source,
            line,
            column,
            "parse failed"
        );
        Error::Parse {
            source,
            line,
            column,
        }
    })
}

/// Runs `parser`, returning its result unchanged. A failed attempt leaves the
/// cursor where it was before the call.
pub fn try_parse<O, P>(parser: &P, cursor: &mut Cursor<'_>, config: &ParseConfig) -> ParseResult<O>
where
    P: Parser<O> + ?Sized,
{
    let snapshot = cursor.snapshot();
    parser.parse(cursor, config).map_err(|e| {
        cursor.restore(snapshot);
        e
    })
}
