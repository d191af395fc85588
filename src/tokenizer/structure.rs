//! Structural pass over the lexeme stream.
//!
//! Validates JSON nesting and punctuation, drops `:` and `,`, and decides
//! which strings are property names. The analyzer only ever sees the
//! resulting [`Token`] sequence, which is guaranteed to be well formed.

use super::{
    literal::Literal,
    symbol::Delimiter,
    token::{Lexeme, Span, Token, TokenizerError, TokenizerResult},
};
use crate::config::TokenizerConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Container {
    Object,
    Array,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Expect {
    Value,
    /// First element position of an array, or after a trailing comma.
    ValueOrEnd,
    /// First entry position of an object, or after a trailing comma.
    KeyOrEnd,
    Key,
    Colon,
    CommaOrEnd,
    Done,
}

impl Expect {
    fn describe(self) -> &'static str {
        match self {
            Expect::Value => "a value",
            Expect::ValueOrEnd => "a value or ']'",
            Expect::KeyOrEnd => "a property name or '}'",
            Expect::Key => "a property name",
            Expect::Colon => "':'",
            Expect::CommaOrEnd => "',' or the end of the container",
            Expect::Done => "the end of input",
        }
    }
}

pub(super) struct Structure {
    stack: Vec<Container>,
    expect: Expect,
    allow_trailing_commas: bool,
    max_depth: usize,
}

impl Structure {
    pub(super) fn new(config: &TokenizerConfig) -> Self {
        Self {
            stack: Vec::new(),
            expect: Expect::Value,
            allow_trailing_commas: config.allow_trailing_commas,
            max_depth: config.max_depth,
        }
    }

    /// Feeds one significant lexeme, returning the token it produces, if any.
    pub(super) fn accept(&mut self, lexeme: Lexeme, span: &Span) -> TokenizerResult<Option<Token>> {
        use Delimiter::*;

        let found = match &lexeme {
            Lexeme::Delimiter(d) => d.to_string(),
            Lexeme::Literal(l) => Token::from_literal(l.clone()).to_string(),
            _ => return Ok(None),
        };

        match (self.expect, lexeme) {
            (Expect::KeyOrEnd | Expect::Key, Lexeme::Literal(Literal::String(name))) => {
                self.expect = Expect::Colon;
                Ok(Some(Token::PropertyName(name)))
            }
            (Expect::KeyOrEnd, Lexeme::Delimiter(CloseBrace)) => self.close(Container::Object),
            (Expect::Colon, Lexeme::Delimiter(Colon)) => {
                self.expect = Expect::Value;
                Ok(None)
            }
            (Expect::ValueOrEnd, Lexeme::Delimiter(CloseBracket)) => self.close(Container::Array),
            (Expect::Value | Expect::ValueOrEnd, Lexeme::Literal(literal)) => {
                self.after_value();
                Ok(Some(Token::from_literal(literal)))
            }
            (Expect::Value | Expect::ValueOrEnd, Lexeme::Delimiter(OpenBrace)) => {
                self.open(Container::Object, span)?;
                self.expect = Expect::KeyOrEnd;
                Ok(Some(Token::ObjectStart))
            }
            (Expect::Value | Expect::ValueOrEnd, Lexeme::Delimiter(OpenBracket)) => {
                self.open(Container::Array, span)?;
                self.expect = Expect::ValueOrEnd;
                Ok(Some(Token::ArrayStart))
            }
            (Expect::CommaOrEnd, Lexeme::Delimiter(Comma)) => {
                self.expect = match (self.stack.last(), self.allow_trailing_commas) {
                    (Some(Container::Object), true) => Expect::KeyOrEnd,
                    (Some(Container::Object), false) => Expect::Key,
                    (_, true) => Expect::ValueOrEnd,
                    (_, false) => Expect::Value,
                };
                Ok(None)
            }
            (Expect::CommaOrEnd, Lexeme::Delimiter(CloseBrace))
                if self.stack.last() == Some(&Container::Object) =>
            {
                self.close(Container::Object)
            }
            (Expect::CommaOrEnd, Lexeme::Delimiter(CloseBracket))
                if self.stack.last() == Some(&Container::Array) =>
            {
                self.close(Container::Array)
            }
            (expect, _) => Err(TokenizerError::ParseError {
                message: format!("expected {}", expect.describe()),
                found,
                span: span.clone(),
            }),
        }
    }

    /// Checks that the input formed exactly one complete value.
    pub(super) fn finish(&self, span: &Span) -> TokenizerResult<()> {
        if self.expect == Expect::Done {
            Ok(())
        } else {
            Err(TokenizerError::UnexpectedEof { span: span.clone() })
        }
    }

    fn open(&mut self, container: Container, span: &Span) -> TokenizerResult<()> {
        if self.stack.len() >= self.max_depth {
            return Err(TokenizerError::DepthExceeded {
                max_depth: self.max_depth,
                span: span.clone(),
            });
        }
        self.stack.push(container);
        Ok(())
    }

    fn close(&mut self, container: Container) -> TokenizerResult<Option<Token>> {
        self.stack.pop();
        self.after_value();
        Ok(Some(match container {
            Container::Object => Token::ObjectEnd,
            Container::Array => Token::ArrayEnd,
        }))
    }

    fn after_value(&mut self) {
        self.expect = if self.stack.is_empty() {
            Expect::Done
        } else {
            Expect::CommaOrEnd
        };
    }
}

#[cfg(test)]
mod tests {
    use crate::config::TokenizerConfig;
    use crate::tokenizer::token::{Tokenizer, TokenizerError};

    fn tokenize(input: &str, config: TokenizerConfig) -> Result<usize, TokenizerError> {
        Tokenizer::new(config).tokenize(input).map(|t| t.len())
    }

    #[test]
    fn test_rejects_missing_colon() {
        let result = tokenize(r#"{"a" 1}"#, TokenizerConfig::default());
        assert!(matches!(result, Err(TokenizerError::ParseError { ref message, .. }) if message == "expected ':'"));
    }

    #[test]
    fn test_rejects_unbalanced_containers() {
        assert!(tokenize("[1}", TokenizerConfig::default()).is_err());
        assert!(matches!(
            tokenize("{\"a\": [1, 2]", TokenizerConfig::default()),
            Err(TokenizerError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_rejects_trailing_content() {
        assert!(tokenize("{} {}", TokenizerConfig::default()).is_err());
        assert!(tokenize("", TokenizerConfig::default()).is_err());
    }

    #[test]
    fn test_trailing_commas() {
        assert!(tokenize(r#"{"a": 1,}"#, TokenizerConfig::default()).is_err());
        let config = TokenizerConfig {
            allow_trailing_commas: true,
            ..TokenizerConfig::default()
        };
        assert_eq!(tokenize(r#"{"a": [1,],}"#, config), Ok(6));
    }

    #[test]
    fn test_max_depth() {
        let config = TokenizerConfig {
            max_depth: 2,
            ..TokenizerConfig::default()
        };
        assert!(tokenize("[[1]]", config.clone()).is_ok());
        assert!(matches!(
            tokenize("[[[1]]]", config),
            Err(TokenizerError::DepthExceeded { max_depth: 2, .. })
        ));
    }

    #[test]
    fn test_scalar_document() {
        assert_eq!(tokenize("\"solo\"", TokenizerConfig::default()), Ok(1));
    }
}
