//! # Structural Symbols
//!
//! The six punctuation characters that give a JSON document its shape.
//! Braces and brackets open and close containers, `:` separates a property
//! name from its value and `,` separates entries.

use std::fmt;

use strum_macros::{AsRefStr, EnumString};

use nom::{
    branch::alt,
    bytes::complete::tag,
    combinator::{map, value},
    error::context,
};

use super::token::{Lexeme, ParserResult};

/// Structural punctuation recognised by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
pub enum Delimiter {
    /// Object start (`{`)
    #[strum(serialize = "{")]
    OpenBrace,
    /// Object end (`}`)
    #[strum(serialize = "}")]
    CloseBrace,
    /// Array start (`[`)
    #[strum(serialize = "[")]
    OpenBracket,
    /// Array end (`]`)
    #[strum(serialize = "]")]
    CloseBracket,
    /// Name separator (`:`)
    #[strum(serialize = ":")]
    Colon,
    /// Entry separator (`,`)
    #[strum(serialize = ",")]
    Comma,
}

// strum's Display derive would read the braces as format syntax
impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_delimiter(input: &str) -> ParserResult<Lexeme> {
    context(
        "delimiter",
        map(
            alt((
                value(Delimiter::OpenBrace, tag("{")),
                value(Delimiter::CloseBrace, tag("}")),
                value(Delimiter::OpenBracket, tag("[")),
                value(Delimiter::CloseBracket, tag("]")),
                value(Delimiter::Colon, tag(":")),
                value(Delimiter::Comma, tag(",")),
            )),
            Lexeme::Delimiter,
        ),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_delimiter() {
        let (rest, lexeme) = parse_delimiter("{}").unwrap();
        assert_eq!(rest, "}");
        assert_eq!(lexeme, Lexeme::Delimiter(Delimiter::OpenBrace));

        let (rest, lexeme) = parse_delimiter(": 1").unwrap();
        assert_eq!(rest, " 1");
        assert_eq!(lexeme, Lexeme::Delimiter(Delimiter::Colon));

        assert!(parse_delimiter("x").is_err());
    }

    #[test]
    fn test_delimiter_display() {
        assert_eq!(Delimiter::CloseBracket.to_string(), "]");
        assert_eq!(Delimiter::OpenBrace.to_string(), "{");
        assert_eq!(Delimiter::CloseBrace.to_string(), "}");
        assert_eq!(",".parse::<Delimiter>().unwrap(), Delimiter::Comma);
    }
}
