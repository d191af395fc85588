//! # Literal Lexemes
//!
//! Strings (with the full JSON escape set, including UTF-16 surrogate pairs),
//! numbers and the `true` / `false` / `null` keywords.
//!
//! Numbers are kept as their source text. The cursor converts them on demand
//! to whatever width the consuming parser asks for, so `255` can be read as a
//! `u8` while `256` fails the same request with a conversion error.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1, take_while_m_n},
    character::complete::{char, digit1, one_of},
    combinator::{map, map_opt, map_res, opt, recognize, value},
    error::context,
    multi::many0,
    sequence::{delimited, pair, preceded, tuple},
};

use super::token::{Lexeme, ParserResult};

/// A scalar value as it appears in the source text.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Number(String),
    Boolean(bool),
    Null,
}

enum StringPart<'a> {
    Literal(&'a str),
    Escaped(char),
}

fn parse_hex4(input: &str) -> ParserResult<u32> {
    map_res(
        take_while_m_n(4, 4, |c: char| c.is_ascii_hexdigit()),
        |hex: &str| u32::from_str_radix(hex, 16),
    )(input)
}

#[tracing::instrument(level = "debug", skip(input))]
fn parse_unicode_escape(input: &str) -> ParserResult<char> {
    context(
        "unicode escape",
        alt((
            // high surrogate followed by a low surrogate
            map_opt(
                pair(
                    preceded(char('u'), parse_hex4),
                    preceded(tag("\\u"), parse_hex4),
                ),
                |(high, low): (u32, u32)| {
                    if (0xD800..0xDC00).contains(&high) && (0xDC00..0xE000).contains(&low) {
                        char::from_u32(0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00))
                    } else {
                        None
                    }
                },
            ),
            map_opt(preceded(char('u'), parse_hex4), char::from_u32),
        )),
    )(input)
}

#[tracing::instrument(level = "debug", skip(input))]
fn parse_escape(input: &str) -> ParserResult<StringPart> {
    context(
        "escape sequence",
        map(
            preceded(
                char('\\'),
                alt((
                    value('"', char('"')),
                    value('\\', char('\\')),
                    value('/', char('/')),
                    value('\u{08}', char('b')),
                    value('\u{0C}', char('f')),
                    value('\n', char('n')),
                    value('\r', char('r')),
                    value('\t', char('t')),
                    parse_unicode_escape,
                )),
            ),
            StringPart::Escaped,
        ),
    )(input)
}

fn parse_unescaped(input: &str) -> ParserResult<StringPart> {
    map(
        take_while1(|c: char| c != '"' && c != '\\' && c >= '\u{20}'),
        StringPart::Literal,
    )(input)
}

#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_string_literal(input: &str) -> ParserResult<String> {
    context(
        "string literal",
        map(
            delimited(
                char('"'),
                many0(alt((parse_unescaped, parse_escape))),
                char('"'),
            ),
            |parts| {
                let mut text = String::new();
                for part in parts {
                    match part {
                        StringPart::Literal(s) => text.push_str(s),
                        StringPart::Escaped(c) => text.push(c),
                    }
                }
                text
            },
        ),
    )(input)
}

#[tracing::instrument(level = "debug", skip(input))]
fn parse_number_literal(input: &str) -> ParserResult<Literal> {
    context(
        "number literal",
        map(
            recognize(tuple((
                opt(char('-')),
                alt((tag("0"), digit1)),
                opt(pair(char('.'), digit1)),
                opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
            ))),
            |s: &str| Literal::Number(s.to_string()),
        ),
    )(input)
}

#[tracing::instrument(level = "debug", skip(input))]
fn parse_keyword_literal(input: &str) -> ParserResult<Literal> {
    context(
        "keyword literal",
        alt((
            value(Literal::Boolean(true), tag("true")),
            value(Literal::Boolean(false), tag("false")),
            value(Literal::Null, tag("null")),
        )),
    )(input)
}

#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_literal(input: &str) -> ParserResult<Lexeme> {
    context(
        "literal",
        map(
            alt((
                map(parse_string_literal, Literal::String),
                parse_number_literal,
                parse_keyword_literal,
            )),
            Lexeme::Literal,
        ),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_string() {
        let (rest, result) = parse_string_literal("\"hello world\"").unwrap();
        assert_eq!(rest, "");
        assert_eq!(result, "hello world");
    }

    #[test]
    fn test_string_escapes() {
        let (_, result) = parse_string_literal(r#""a\"b\\c\/d\n\t""#).unwrap();
        assert_eq!(result, "a\"b\\c/d\n\t");
    }

    #[test]
    fn test_unicode_escapes() {
        let (_, result) = parse_string_literal(r#""\u00e9\u0041""#).unwrap();
        assert_eq!(result, "éA");

        let (_, result) = parse_string_literal(r#""\ud83d\ude00""#).unwrap();
        assert_eq!(result, "😀");

        // lone surrogate
        assert!(parse_string_literal(r#""\ud83d""#).is_err());
    }

    #[test]
    fn test_unterminated_string() {
        assert!(parse_string_literal("\"abc").is_err());
        assert!(parse_string_literal("\"a\nb\"").is_err());
    }

    #[test]
    fn test_raw_c1_controls_allowed() {
        let (_, result) = parse_string_literal("\"a\u{7f}b\u{85}c\"").unwrap();
        assert_eq!(result, "a\u{7f}b\u{85}c");
        assert!(parse_string_literal("\"a\u{1f}b\"").is_err());
    }

    #[test]
    fn test_numbers() {
        let cases = [
            ("0", "0"),
            ("-12", "-12"),
            ("3.25", "3.25"),
            ("1e10", "1e10"),
            ("-2.5E-3", "-2.5E-3"),
        ];
        for (input, expected) in cases {
            let (rest, literal) = parse_number_literal(input).unwrap();
            assert_eq!(rest, "");
            assert_eq!(literal, Literal::Number(expected.to_string()));
        }

        // leading zeros stop after the zero
        let (rest, _) = parse_number_literal("012").unwrap();
        assert_eq!(rest, "12");
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            parse_literal("true,").unwrap(),
            (",", Lexeme::Literal(Literal::Boolean(true)))
        );
        assert_eq!(
            parse_literal("null").unwrap(),
            ("", Lexeme::Literal(Literal::Null))
        );
        assert!(parse_literal("nil").is_err());
    }
}
