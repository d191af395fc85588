//! Forward-only reader over a tokenized document.
//!
//! [`Cursor`] behaves like a streaming JSON reader: it starts *before* the
//! first token, [`Cursor::advance`] moves onto the next one, and the typed
//! accessors read the token it currently sits on. Unlike a streaming reader
//! it is `Copy`, so taking a snapshot and restoring it is a plain value copy
//! and backtracking never re-reads anything.

use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::tokenizer::{Token, TokenKind, TokenSpan};

/// Owned token storage that cursors borrow from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TokenBuffer {
    tokens: Vec<TokenSpan>,
}

impl TokenBuffer {
    pub fn new(tokens: Vec<TokenSpan>) -> Self {
        Self { tokens }
    }

    /// Builds a buffer from bare tokens that carry no source location.
    pub fn from_tokens(tokens: impl IntoIterator<Item = Token>) -> Self {
        tokens.into_iter().collect()
    }

    /// A cursor positioned before the first token.
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(&self.tokens)
    }

    pub fn tokens(&self) -> &[TokenSpan] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl FromIterator<Token> for TokenBuffer {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(TokenSpan::detached).collect())
    }
}

impl From<Vec<TokenSpan>> for TokenBuffer {
    fn from(tokens: Vec<TokenSpan>) -> Self {
        Self::new(tokens)
    }
}

/// A position in a token slice.
///
/// `position()` counts the tokens consumed so far. The current token is the
/// last consumed one; there is none until the first successful
/// [`advance`](Cursor::advance).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor<'a> {
    tokens: &'a [TokenSpan],
    consumed: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a [TokenSpan]) -> Self {
        Self {
            tokens,
            consumed: 0,
        }
    }

    /// Moves onto the next token. Returns `false` at the end of the stream,
    /// leaving the cursor unchanged.
    pub fn advance(&mut self) -> bool {
        if self.consumed < self.tokens.len() {
            self.consumed += 1;
            true
        } else {
            false
        }
    }

    pub fn position(&self) -> usize {
        self.consumed
    }

    pub fn is_finished(&self) -> bool {
        self.consumed >= self.tokens.len()
    }

    pub fn snapshot(&self) -> Cursor<'a> {
        *self
    }

    pub fn restore(&mut self, snapshot: Cursor<'a>) {
        *self = snapshot;
    }

    pub fn current(&self) -> Option<&'a TokenSpan> {
        self.consumed
            .checked_sub(1)
            .and_then(|index| self.tokens.get(index))
    }

    pub fn token(&self) -> Option<&'a Token> {
        self.current().map(|span| &span.token)
    }

    pub fn token_kind(&self) -> Option<TokenKind> {
        self.token().map(Token::kind)
    }

    /// Kind of the token the next `advance` would move onto.
    pub fn peek_kind(&self) -> Option<TokenKind> {
        self.tokens.get(self.consumed).map(|span| span.token.kind())
    }

    /// Line and column of the current token, falling back to the next one
    /// when nothing has been consumed yet. `(0, 0)` when neither exists.
    pub fn location(&self) -> (usize, usize) {
        self.current()
            .or_else(|| self.tokens.get(self.consumed))
            .map(|span| (span.line, span.column))
            .unwrap_or((0, 0))
    }

    /// Short human-readable form of the current token for error messages.
    pub fn describe_current(&self) -> String {
        match self.token() {
            Some(token) => token.to_string(),
            None => "nothing".to_string(),
        }
    }

    /// Text of a `String` or `PropertyName` token.
    pub fn get_string(&self) -> Option<&'a str> {
        match self.token()? {
            Token::String(s) | Token::PropertyName(s) => Some(s),
            _ => None,
        }
    }

    pub fn get_bool(&self) -> Option<bool> {
        match self.token()? {
            Token::True => Some(true),
            Token::False => Some(false),
            _ => None,
        }
    }

    /// Reads a `Number` token as `N`. Fails when the source text does not fit
    /// the target, e.g. a fraction read as an integer or an overflow.
    pub fn try_get_number<N: FromStr>(&self) -> Option<N> {
        match self.token()? {
            Token::Number(raw) => raw.parse().ok(),
            _ => None,
        }
    }

    /// Reads a `Number` token as a finite `f64`. Out-of-range text that
    /// would round to infinity does not convert.
    pub fn try_get_f64(&self) -> Option<f64> {
        self.try_get_number::<f64>().filter(|n| n.is_finite())
    }

    pub fn try_get_f32(&self) -> Option<f32> {
        self.try_get_number::<f32>().filter(|n| n.is_finite())
    }

    /// Reads a `Number` token as a [`Decimal`], exponent notation included.
    pub fn try_get_decimal(&self) -> Option<Decimal> {
        match self.token()? {
            Token::Number(raw) if raw.contains(['e', 'E']) => Decimal::from_scientific(raw).ok(),
            Token::Number(raw) => Decimal::from_str_exact(raw).ok(),
            _ => None,
        }
    }

    /// Reads the hyphenated 36-character form only.
    pub fn try_get_guid(&self) -> Option<Uuid> {
        match self.token()? {
            Token::String(s) if s.len() == 36 => Uuid::try_parse(s).ok(),
            _ => None,
        }
    }

    /// Reads an ISO 8601 date-time. An offset, when present, is applied and
    /// the result is the UTC wall time; a bare date reads as midnight.
    pub fn try_get_datetime(&self) -> Option<NaiveDateTime> {
        let text = self.get_value_string()?;
        NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .or_else(|| {
                DateTime::parse_from_rfc3339(text)
                    .ok()
                    .map(|dt| dt.naive_utc())
            })
            .or_else(|| {
                NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })
    }

    /// Reads an ISO 8601 date-time with offset. Text without an offset is
    /// read as UTC.
    pub fn try_get_datetime_offset(&self) -> Option<DateTime<FixedOffset>> {
        let text = self.get_value_string()?;
        DateTime::parse_from_rfc3339(text).ok().or_else(|| {
            let naive = self.try_get_datetime()?;
            let utc = FixedOffset::east_opt(0)?;
            Some(naive.and_local_timezone(utc).single()?)
        })
    }

    pub fn try_get_bytes_from_base64(&self) -> Option<Vec<u8>> {
        STANDARD.decode(self.get_value_string()?).ok()
    }

    /// Skips the value whose first token is the current one. For a container
    /// start this moves to the matching end token; a scalar is already
    /// complete. Returns `false` when the current token cannot start a value
    /// or the stream ends inside the container.
    pub fn skip_value(&mut self) -> bool {
        let mut depth = match self.token_kind() {
            Some(TokenKind::ObjectStart | TokenKind::ArrayStart) => 1usize,
            Some(TokenKind::ObjectEnd | TokenKind::ArrayEnd | TokenKind::PropertyName) | None => {
                return false
            }
            Some(_) => return true,
        };
        while depth > 0 {
            if !self.advance() {
                return false;
            }
            match self.token_kind() {
                Some(TokenKind::ObjectStart | TokenKind::ArrayStart) => depth += 1,
                Some(TokenKind::ObjectEnd | TokenKind::ArrayEnd) => depth -= 1,
                _ => {}
            }
        }
        true
    }

    fn get_value_string(&self) -> Option<&'a str> {
        match self.token()? {
            Token::String(s) => Some(s),
            _ => None,
        }
    }
}
