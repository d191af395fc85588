//! # Tokenizer
//!
//! Reference token source for the analyzer. Turns JSON text into a flat
//! sequence of [`TokenSpan`]s in two passes:
//!
//! 1. **Lexing**: nom parsers recognise whitespace, comments, literals and
//!    delimiters, tracking line and column as they go.
//! 2. **Structure**: a small state machine checks nesting and punctuation and
//!    emits structural [`Token`]s, turning strings in key position into
//!    [`Token::PropertyName`].
//!
//! Any other tokenizer can feed the analyzer by building a
//! [`TokenBuffer`](crate::analyzer::cursor::TokenBuffer) from its own tokens.

pub mod comment;
pub mod literal;
mod structure;
pub mod symbol;
pub mod token;
pub mod whitespace;

pub use token::{Span, Token, TokenKind, TokenSpan, Tokenizer, TokenizerError, TokenizerResult};
