use std::any::type_name;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};

use super::scalars::{PROPERTY_NAME, STRING};
use super::tokens::START_OBJECT;
use crate::analyzer::combinators::Then;
use crate::analyzer::core::{FromFn, ParseError, ParseResult, Parser};
use crate::analyzer::cursor::Cursor;
use crate::config::ParseConfig;
use crate::tokenizer::{Token, TokenKind};

/// A string value equal to one of `expected`.
#[derive(Debug, Clone)]
pub struct ExpectedString {
    expected: Vec<String>,
    property_name: bool,
}

impl ExpectedString {
    fn describe(&self) -> String {
        self.expected.join(" or ")
    }

    fn matches(&self, value: &str, config: &ParseConfig) -> bool {
        self.expected.iter().any(|candidate| {
            if self.property_name && config.case_insensitive_properties {
                candidate.eq_ignore_ascii_case(value)
            } else {
                candidate == value
            }
        })
    }
}

impl Parser<String> for ExpectedString {
    fn parse(&self, cursor: &mut Cursor<'_>, config: &ParseConfig) -> ParseResult<String> {
        let value = if self.property_name {
            PROPERTY_NAME.parse(cursor, config)?
        } else {
            STRING.parse(cursor, config)?
        };
        if self.matches(&value, config) {
            Ok(value)
        } else {
            Err(ParseError::Unexpected {
                expected: self.describe(),
                found: value,
                position: cursor.position(),
            })
        }
    }
}

/// A `String` token whose text is one of `expected`.
pub fn parse_string<I, S>(expected: I) -> ExpectedString
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    ExpectedString {
        expected: expected.into_iter().map(Into::into).collect(),
        property_name: false,
    }
}

/// A `PropertyName` token equal to `expected`, ignoring ASCII case when
/// [`ParseConfig::case_insensitive_properties`] is set.
pub fn parse_property_name(expected: impl Into<String>) -> ExpectedString {
    ExpectedString {
        expected: vec![expected.into()],
        property_name: true,
    }
}

/// A property named `name` with a string value, yielding `(name, value)`.
pub fn parse_string_property(
    name: impl Into<String>,
) -> impl Parser<(String, String)> {
    let expected = parse_property_name(name);
    FromFn::new(move |cursor: &mut Cursor<'_>, config: &ParseConfig| {
        let name = expected.parse(cursor, config)?;
        let value = STRING.parse(cursor, config)?;
        Ok((name, value))
    })
}

/// Reads the next complete value and deserializes it with serde.
///
/// This is the escape hatch for values that have no dedicated parser. The
/// tokens are rebuilt into a [`serde_json::Value`] no deeper than
/// [`ParseConfig::max_depth`], then converted to `T`.
pub struct TypeParser<T> {
    _phantom: PhantomData<fn() -> T>,
}

impl<T> Clone for TypeParser<T> {
    fn clone(&self) -> Self {
        parse_type()
    }
}

impl<T: DeserializeOwned> Parser<T> for TypeParser<T> {
    fn parse(&self, cursor: &mut Cursor<'_>, config: &ParseConfig) -> ParseResult<T> {
        if !cursor.advance() {
            return Err(ParseError::EndOfStream {
                position: cursor.position(),
            });
        }
        let start = cursor.snapshot();
        let value = read_value(cursor, 0, config.max_depth)?;
        serde_json::from_value(value).map_err(|e| {
            tracing::debug!(target: "parser::type", error = %e, "deserialization failed");
            ParseError::Conversion {
                target: type_name::<T>().to_string(),
                found: start.describe_current(),
                position: start.position(),
            }
        })
    }
}

pub fn parse_type<T>() -> TypeParser<T> {
    TypeParser {
        _phantom: PhantomData,
    }
}

/// A property named `name` whose value is deserialized as `T`.
pub fn parse_type_property<T: DeserializeOwned>(
    name: impl Into<String>,
) -> Then<ExpectedString, TypeParser<T>, String> {
    Then::new(parse_property_name(name), parse_type())
}

/// Consumes one complete value of any shape.
#[derive(Debug, Clone, Copy)]
pub struct SkipValue;

impl Parser<()> for SkipValue {
    fn parse(&self, cursor: &mut Cursor<'_>, _config: &ParseConfig) -> ParseResult<()> {
        if !cursor.advance() {
            return Err(ParseError::EndOfStream {
                position: cursor.position(),
            });
        }
        if cursor.skip_value() {
            Ok(())
        } else {
            Err(unexpected_token(cursor, "a value"))
        }
    }
}

pub fn skip_value() -> SkipValue {
    SkipValue
}

/// An object that is entered but whose properties are all ignored.
pub fn ignore_object() -> impl Parser<()> {
    Then::new(
        START_OBJECT,
        FromFn::new(|cursor: &mut Cursor<'_>, _: &ParseConfig| {
            if cursor.skip_value() {
                Ok(())
            } else {
                Err(ParseError::EndOfStream {
                    position: cursor.position(),
                })
            }
        }),
    )
}

fn depth_error(cursor: &Cursor<'_>, max_depth: usize) -> ParseError {
    ParseError::Fail(format!(
        "maximum depth {} exceeded at position {}",
        max_depth,
        cursor.position()
    ))
}

fn expect_more(cursor: &mut Cursor<'_>) -> ParseResult<()> {
    if cursor.advance() {
        Ok(())
    } else {
        Err(ParseError::EndOfStream {
            position: cursor.position(),
        })
    }
}

/// Rebuilds the value that starts at the current token.
fn read_value(cursor: &mut Cursor<'_>, depth: usize, max_depth: usize) -> ParseResult<Value> {
    let token = match cursor.token() {
        Some(token) => token,
        None => {
            return Err(ParseError::EndOfStream {
                position: cursor.position(),
            })
        }
    };
    match token {
        Token::Null => Ok(Value::Null),
        Token::True => Ok(Value::Bool(true)),
        Token::False => Ok(Value::Bool(false)),
        Token::String(s) => Ok(Value::String(s.clone())),
        Token::Number(raw) => raw
            .parse::<Number>()
            .map(Value::Number)
            .map_err(|_| ParseError::Conversion {
                target: "number".to_string(),
                found: raw.clone(),
                position: cursor.position(),
            }),
        Token::ArrayStart => {
            if depth >= max_depth {
                return Err(depth_error(cursor, max_depth));
            }
            let mut items = Vec::new();
            loop {
                expect_more(cursor)?;
                if cursor.token_kind() == Some(TokenKind::ArrayEnd) {
                    return Ok(Value::Array(items));
                }
                items.push(read_value(cursor, depth + 1, max_depth)?);
            }
        }
        Token::ObjectStart => {
            if depth >= max_depth {
                return Err(depth_error(cursor, max_depth));
            }
            let mut map = Map::new();
            loop {
                expect_more(cursor)?;
                let key = match cursor.token() {
                    Some(Token::ObjectEnd) => return Ok(Value::Object(map)),
                    Some(Token::PropertyName(name)) => name.clone(),
                    _ => return Err(unexpected_token(cursor, "PropertyName or ObjectEnd")),
                };
                expect_more(cursor)?;
                let value = read_value(cursor, depth + 1, max_depth)?;
                map.insert(key, value);
            }
        }
        Token::ObjectEnd | Token::ArrayEnd | Token::PropertyName(_) => {
            Err(unexpected_token(cursor, "a value"))
        }
    }
}

fn unexpected_token(cursor: &Cursor<'_>, expected: &str) -> ParseError {
    match cursor.token_kind() {
        Some(found) => ParseError::TokenMismatch {
            expected: expected.to_string(),
            found,
            position: cursor.position(),
        },
        None => ParseError::EndOfStream {
            position: cursor.position(),
        },
    }
}
