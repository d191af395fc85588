//! Eliminators over [`ParseResult`].
//!
//! A parse result is a plain `Result<T, ParseError>`, so `?`, `map` and
//! `and_then` already cover sequencing. [`ResultExt`] adds the handful of
//! eliminators parser code reaches for when it wants a value out without
//! matching by hand.

use super::core::{ParseError, ParseResult};
use crate::{Error, InternalResult};

/// A successful result carrying `value`.
pub fn success<T>(value: T) -> ParseResult<T> {
    Ok(value)
}

/// A failed result carrying `message`.
pub fn failure<T>(message: impl Into<String>) -> ParseResult<T> {
    Err(ParseError::Fail(message.into()))
}

pub trait ResultExt<T> {
    /// Applies exactly one of the two handlers.
    fn match_with<U>(
        self,
        on_success: impl FnOnce(T) -> U,
        on_failure: impl FnOnce(ParseError) -> U,
    ) -> U;

    /// The value, or `alternative` on failure.
    fn if_failure(self, alternative: T) -> T;

    /// The value, or the alternative computed from the failure.
    fn if_failure_else(self, alternative: impl FnOnce(&ParseError) -> T) -> T;

    /// Continues with `next` on success; a failure is re-typed unchanged.
    fn if_success<U>(self, next: impl FnOnce(T) -> ParseResult<U>) -> ParseResult<U>;

    fn is_success(&self) -> bool;

    /// Terminal extraction. A failure becomes a fatal [`Error::Failed`].
    fn into_value(self) -> InternalResult<T>;
}

impl<T> ResultExt<T> for ParseResult<T> {
    fn match_with<U>(
        self,
        on_success: impl FnOnce(T) -> U,
        on_failure: impl FnOnce(ParseError) -> U,
    ) -> U {
        match self {
            Ok(value) => on_success(value),
            Err(error) => on_failure(error),
        }
    }

    fn if_failure(self, alternative: T) -> T {
        self.unwrap_or(alternative)
    }

    fn if_failure_else(self, alternative: impl FnOnce(&ParseError) -> T) -> T {
        match self {
            Ok(value) => value,
            Err(error) => alternative(&error),
        }
    }

    fn if_success<U>(self, next: impl FnOnce(T) -> ParseResult<U>) -> ParseResult<U> {
        match self {
            Ok(value) => next(value),
            Err(error) => error.repack(),
        }
    }

    fn is_success(&self) -> bool {
        self.is_ok()
    }

    fn into_value(self) -> InternalResult<T> {
        self.map_err(Error::from)
    }
}
