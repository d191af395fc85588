//! Typed value parsers.
//!
//! Every scalar parser consumes exactly one token: it checks the token kind
//! first, then converts the payload. A kind mismatch reports
//! [`ParseError::TokenMismatch`]; a payload that does not convert reports
//! [`ParseError::Conversion`].

use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use rust_decimal::Decimal;
use url::Url;
use uuid::Uuid;

use super::tokens::{
    ParseToken, BOOLEAN_TOKEN, NUMBER_TOKEN, OPTIONAL_BOOLEAN_TOKEN, OPTIONAL_NUMBER_TOKEN,
    OPTIONAL_STRING_TOKEN, PROPERTY_NAME_TOKEN, STRING_TOKEN,
};
use crate::analyzer::core::{ParseError, ParseResult, Parser};
use crate::analyzer::cursor::Cursor;
use crate::config::ParseConfig;
use crate::tokenizer::TokenKind;

type Extract<T> = fn(&Cursor<'_>) -> Option<T>;

pub struct Scalar<T> {
    token: ParseToken,
    target: &'static str,
    extract: Extract<T>,
}

impl<T> Scalar<T> {
    pub const fn new(token: ParseToken, target: &'static str, extract: Extract<T>) -> Self {
        Self {
            token,
            target,
            extract,
        }
    }

    pub fn target(&self) -> &'static str {
        self.target
    }
}

impl<T> Clone for Scalar<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Scalar<T> {}

impl<T> std::fmt::Debug for Scalar<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scalar")
            .field("token", &self.token)
            .field("target", &self.target)
            .finish()
    }
}

impl<T> Parser<T> for Scalar<T> {
    fn parse(&self, cursor: &mut Cursor<'_>, config: &ParseConfig) -> ParseResult<T> {
        self.token.parse(cursor, config)?;
        (self.extract)(cursor).ok_or_else(|| ParseError::Conversion {
            target: self.target.to_string(),
            found: cursor.describe_current(),
            position: cursor.position(),
        })
    }
}

fn is_null(cursor: &Cursor<'_>) -> bool {
    cursor.token_kind() == Some(TokenKind::Null)
}

fn extract_string(cursor: &Cursor<'_>) -> Option<String> {
    cursor.get_string().map(str::to_owned)
}

fn extract_optional_string(cursor: &Cursor<'_>) -> Option<Option<String>> {
    if is_null(cursor) {
        return Some(None);
    }
    extract_string(cursor).map(Some)
}

fn extract_bool(cursor: &Cursor<'_>) -> Option<bool> {
    cursor.get_bool()
}

fn extract_optional_bool(cursor: &Cursor<'_>) -> Option<Option<bool>> {
    if is_null(cursor) {
        return Some(None);
    }
    cursor.get_bool().map(Some)
}

fn extract_number<N: FromStr>(cursor: &Cursor<'_>) -> Option<N> {
    cursor.try_get_number()
}

fn extract_optional_number<N: FromStr>(cursor: &Cursor<'_>) -> Option<Option<N>> {
    if is_null(cursor) {
        return Some(None);
    }
    cursor.try_get_number().map(Some)
}

fn extract_f32(cursor: &Cursor<'_>) -> Option<f32> {
    cursor.try_get_f32()
}

fn extract_f64(cursor: &Cursor<'_>) -> Option<f64> {
    cursor.try_get_f64()
}

fn extract_optional_f64(cursor: &Cursor<'_>) -> Option<Option<f64>> {
    if is_null(cursor) {
        return Some(None);
    }
    cursor.try_get_f64().map(Some)
}

fn extract_decimal(cursor: &Cursor<'_>) -> Option<Decimal> {
    cursor.try_get_decimal()
}

fn extract_optional_decimal(cursor: &Cursor<'_>) -> Option<Option<Decimal>> {
    if is_null(cursor) {
        return Some(None);
    }
    cursor.try_get_decimal().map(Some)
}

fn extract_guid(cursor: &Cursor<'_>) -> Option<Uuid> {
    cursor.try_get_guid()
}

fn extract_optional_guid(cursor: &Cursor<'_>) -> Option<Option<Uuid>> {
    if is_null(cursor) {
        return Some(None);
    }
    cursor.try_get_guid().map(Some)
}

fn extract_datetime(cursor: &Cursor<'_>) -> Option<NaiveDateTime> {
    cursor.try_get_datetime()
}

fn extract_optional_datetime(cursor: &Cursor<'_>) -> Option<Option<NaiveDateTime>> {
    if is_null(cursor) {
        return Some(None);
    }
    cursor.try_get_datetime().map(Some)
}

fn extract_datetime_offset(cursor: &Cursor<'_>) -> Option<DateTime<FixedOffset>> {
    cursor.try_get_datetime_offset()
}

fn extract_bytes(cursor: &Cursor<'_>) -> Option<Vec<u8>> {
    cursor.try_get_bytes_from_base64()
}

fn extract_uri(cursor: &Cursor<'_>) -> Option<Url> {
    Url::parse(cursor.get_string()?).ok()
}

fn extract_optional_uri(cursor: &Cursor<'_>) -> Option<Option<Url>> {
    if is_null(cursor) {
        return Some(None);
    }
    extract_uri(cursor).map(Some)
}

pub const STRING: Scalar<String> = Scalar::new(STRING_TOKEN, "string", extract_string);
pub const OPTIONAL_STRING: Scalar<Option<String>> =
    Scalar::new(OPTIONAL_STRING_TOKEN, "string or null", extract_optional_string);
pub const PROPERTY_NAME: Scalar<String> =
    Scalar::new(PROPERTY_NAME_TOKEN, "property name", extract_string);

pub const BOOL: Scalar<bool> = Scalar::new(BOOLEAN_TOKEN, "bool", extract_bool);
pub const OPTIONAL_BOOL: Scalar<Option<bool>> =
    Scalar::new(OPTIONAL_BOOLEAN_TOKEN, "bool or null", extract_optional_bool);

pub const I8: Scalar<i8> = Scalar::new(NUMBER_TOKEN, "i8", extract_number::<i8>);
pub const I16: Scalar<i16> = Scalar::new(NUMBER_TOKEN, "i16", extract_number::<i16>);
pub const I32: Scalar<i32> = Scalar::new(NUMBER_TOKEN, "i32", extract_number::<i32>);
pub const I64: Scalar<i64> = Scalar::new(NUMBER_TOKEN, "i64", extract_number::<i64>);
pub const U8: Scalar<u8> = Scalar::new(NUMBER_TOKEN, "u8", extract_number::<u8>);
pub const U16: Scalar<u16> = Scalar::new(NUMBER_TOKEN, "u16", extract_number::<u16>);
pub const U32: Scalar<u32> = Scalar::new(NUMBER_TOKEN, "u32", extract_number::<u32>);
pub const U64: Scalar<u64> = Scalar::new(NUMBER_TOKEN, "u64", extract_number::<u64>);
pub const F32: Scalar<f32> = Scalar::new(NUMBER_TOKEN, "f32", extract_f32);
pub const F64: Scalar<f64> = Scalar::new(NUMBER_TOKEN, "f64", extract_f64);
pub const DECIMAL: Scalar<Decimal> = Scalar::new(NUMBER_TOKEN, "decimal", extract_decimal);
pub const OPTIONAL_I32: Scalar<Option<i32>> = Scalar::new(
    OPTIONAL_NUMBER_TOKEN,
    "i32 or null",
    extract_optional_number::<i32>,
);
pub const OPTIONAL_I64: Scalar<Option<i64>> = Scalar::new(
    OPTIONAL_NUMBER_TOKEN,
    "i64 or null",
    extract_optional_number::<i64>,
);
pub const OPTIONAL_F64: Scalar<Option<f64>> = Scalar::new(
    OPTIONAL_NUMBER_TOKEN,
    "f64 or null",
    extract_optional_f64,
);
pub const OPTIONAL_DECIMAL: Scalar<Option<Decimal>> = Scalar::new(
    OPTIONAL_NUMBER_TOKEN,
    "decimal or null",
    extract_optional_decimal,
);

pub const GUID: Scalar<Uuid> = Scalar::new(STRING_TOKEN, "guid", extract_guid);
pub const OPTIONAL_GUID: Scalar<Option<Uuid>> =
    Scalar::new(OPTIONAL_STRING_TOKEN, "guid or null", extract_optional_guid);

pub const DATE_TIME: Scalar<NaiveDateTime> =
    Scalar::new(STRING_TOKEN, "date-time", extract_datetime);
pub const OPTIONAL_DATE_TIME: Scalar<Option<NaiveDateTime>> = Scalar::new(
    OPTIONAL_STRING_TOKEN,
    "date-time or null",
    extract_optional_datetime,
);
pub const DATE_TIME_OFFSET: Scalar<DateTime<FixedOffset>> = Scalar::new(
    STRING_TOKEN,
    "date-time with offset",
    extract_datetime_offset,
);

pub const BYTES_FROM_BASE64: Scalar<Vec<u8>> =
    Scalar::new(STRING_TOKEN, "base64 bytes", extract_bytes);

pub const URI: Scalar<Url> = Scalar::new(STRING_TOKEN, "uri", extract_uri);
pub const OPTIONAL_URI: Scalar<Option<Url>> =
    Scalar::new(OPTIONAL_STRING_TOKEN, "uri or null", extract_optional_uri);
