//! # tokenfold
//!
//! Parser combinators over a pre-tokenized JSON stream.
//!
//! A document is first turned into a flat [`TokenBuffer`] by the
//! [`tokenizer`] (or by any other source of [`Token`]s). Parsers then walk a
//! copyable [`Cursor`] over that buffer. Backtracking combinators such as
//! [`Or`](analyzer::combinators::Or) and [`Many`](analyzer::combinators::Many)
//! snapshot the cursor by copying it, so no token is ever read twice from the
//! source.
//!
//! Objects are decoded by the [`analyzer::object`] engine, which folds one
//! [`Updater`] per property over an initial value.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod tokenizer;

pub use analyzer::{
    parse, try_parse, BoxedParser, Cursor, ParseError, ParseResult, Parser, ResultExt,
    SharedParser, TokenBuffer, Updater, UpdaterExt,
};
pub use config::{ParseConfig, TokenizerConfig};
pub use error::*;
pub use tokenizer::{Token, TokenKind};

/// Tokenizes `input` into a buffer that cursors can borrow.
pub fn tokenize(input: &str, config: &TokenizerConfig) -> InternalResult<TokenBuffer> {
    let tokens = tokenizer::Tokenizer::new(config.clone()).tokenize(input)?;
    Ok(TokenBuffer::new(tokens))
}

/// Tokenizes `input` with `config.tokenizer` and runs `parser` from the
/// first token.
pub fn parse_str<O, P>(parser: &P, input: &str, config: &ParseConfig) -> InternalResult<O>
where
    P: Parser<O> + ?Sized,
{
    let buffer = tokenize(input, &config.tokenizer)?;
    let mut cursor = buffer.cursor();
    parse(parser, &mut cursor, config)
}
