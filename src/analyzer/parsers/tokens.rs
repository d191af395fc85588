//! Token-kind parsers: each consumes one token and checks only its kind.

use crate::analyzer::combinators::Then;
use crate::analyzer::core::{ParseError, ParseResult, Parser};
use crate::analyzer::cursor::Cursor;
use crate::config::ParseConfig;
use crate::tokenizer::TokenKind;

/// Matches one token whose kind is in `kinds`, yielding that kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParseToken {
    kinds: &'static [TokenKind],
    advance: bool,
}

impl ParseToken {
    /// Advances onto the next token, then checks its kind.
    pub const fn new(kinds: &'static [TokenKind]) -> Self {
        Self {
            kinds,
            advance: true,
        }
    }

    /// Checks the kind of the token the cursor already sits on.
    pub const fn current(kinds: &'static [TokenKind]) -> Self {
        Self {
            kinds,
            advance: false,
        }
    }

    pub fn kinds(&self) -> &'static [TokenKind] {
        self.kinds
    }

    pub(crate) fn describe(&self) -> String {
        self.kinds
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" or ")
    }
}

impl Parser<TokenKind> for ParseToken {
    fn parse(&self, cursor: &mut Cursor<'_>, _config: &ParseConfig) -> ParseResult<TokenKind> {
        if self.advance && !cursor.advance() {
            return Err(ParseError::EndOfStream {
                position: cursor.position(),
            });
        }
        match cursor.token_kind() {
            Some(kind) if self.kinds.contains(&kind) => Ok(kind),
            Some(found) => Err(ParseError::TokenMismatch {
                expected: self.describe(),
                found,
                position: cursor.position(),
            }),
            None => Err(ParseError::EndOfStream {
                position: cursor.position(),
            }),
        }
    }
}

pub const fn parse_token(kinds: &'static [TokenKind]) -> ParseToken {
    ParseToken::new(kinds)
}

pub const fn current_token(kinds: &'static [TokenKind]) -> ParseToken {
    ParseToken::current(kinds)
}

pub const START_OBJECT: ParseToken = parse_token(&[TokenKind::ObjectStart]);
pub const END_OBJECT: ParseToken = parse_token(&[TokenKind::ObjectEnd]);
pub const START_ARRAY: ParseToken = parse_token(&[TokenKind::ArrayStart]);
pub const END_ARRAY: ParseToken = parse_token(&[TokenKind::ArrayEnd]);
pub const PROPERTY_NAME_TOKEN: ParseToken = parse_token(&[TokenKind::PropertyName]);
pub const STRING_TOKEN: ParseToken = parse_token(&[TokenKind::String]);
pub const OPTIONAL_STRING_TOKEN: ParseToken = parse_token(&[TokenKind::String, TokenKind::Null]);
pub const NUMBER_TOKEN: ParseToken = parse_token(&[TokenKind::Number]);
pub const OPTIONAL_NUMBER_TOKEN: ParseToken = parse_token(&[TokenKind::Number, TokenKind::Null]);
pub const TRUE_TOKEN: ParseToken = parse_token(&[TokenKind::True]);
pub const FALSE_TOKEN: ParseToken = parse_token(&[TokenKind::False]);
pub const BOOLEAN_TOKEN: ParseToken = parse_token(&[TokenKind::True, TokenKind::False]);
pub const OPTIONAL_BOOLEAN_TOKEN: ParseToken =
    parse_token(&[TokenKind::True, TokenKind::False, TokenKind::Null]);
pub const NULL_TOKEN: ParseToken = parse_token(&[TokenKind::Null]);

/// `{` immediately followed by `}`.
pub const EMPTY_OBJECT: Then<ParseToken, ParseToken, TokenKind> = Then::new(START_OBJECT, END_OBJECT);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::cursor::TokenBuffer;
    use crate::tokenizer::Token;

    #[test]
    fn test_parse_token_advances() {
        let buffer = TokenBuffer::from_tokens(vec![Token::ObjectStart, Token::ObjectEnd]);
        let mut cursor = buffer.cursor();
        let config = ParseConfig::default();

        assert_eq!(START_OBJECT.parse(&mut cursor, &config), Ok(TokenKind::ObjectStart));
        assert_eq!(cursor.position(), 1);
        assert_eq!(
            START_OBJECT.parse(&mut cursor, &config),
            Err(ParseError::TokenMismatch {
                expected: "ObjectStart".to_string(),
                found: TokenKind::ObjectEnd,
                position: 2,
            })
        );
        assert_eq!(
            END_OBJECT.parse(&mut cursor, &config),
            Err(ParseError::EndOfStream { position: 2 })
        );
    }

    #[test]
    fn test_current_token_does_not_advance() {
        let buffer = TokenBuffer::from_tokens(vec![Token::Null]);
        let mut cursor = buffer.cursor();
        let config = ParseConfig::default();
        let on_null = current_token(&[TokenKind::Null]);

        assert!(on_null.parse(&mut cursor, &config).is_err());
        cursor.advance();
        assert_eq!(on_null.parse(&mut cursor, &config), Ok(TokenKind::Null));
        assert_eq!(on_null.parse(&mut cursor, &config), Ok(TokenKind::Null));
        assert_eq!(cursor.position(), 1);
    }

    #[test]
    fn test_multi_kind_tokens() {
        let buffer = TokenBuffer::from_tokens(vec![Token::False, Token::Null, Token::True]);
        let mut cursor = buffer.cursor();
        let config = ParseConfig::default();

        assert_eq!(BOOLEAN_TOKEN.parse(&mut cursor, &config), Ok(TokenKind::False));
        let error = BOOLEAN_TOKEN.parse(&mut cursor, &config).unwrap_err();
        assert!(error.to_string().contains("True or False"));
        assert_eq!(
            OPTIONAL_BOOLEAN_TOKEN.parse(&mut cursor, &config),
            Ok(TokenKind::True)
        );
    }

    #[test]
    fn test_empty_object() {
        let config = ParseConfig::default();
        let empty = TokenBuffer::from_tokens(vec![Token::ObjectStart, Token::ObjectEnd]);
        assert_eq!(
            EMPTY_OBJECT.parse(&mut empty.cursor(), &config),
            Ok(TokenKind::ObjectEnd)
        );

        let filled = crate::tokenize(r#"{"a": 1}"#, &Default::default()).unwrap();
        assert!(EMPTY_OBJECT.parse(&mut filled.cursor(), &config).is_err());
    }
}
