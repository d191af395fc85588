use nom::{branch::alt, error::VerboseError, IResult};
use strum::{Display, EnumIter};
use thiserror::Error;

use super::{
    comment::parse_comment,
    literal::{parse_literal, Literal},
    structure::Structure,
    symbol::{parse_delimiter, Delimiter},
    whitespace::{parse_newline, parse_whitespace},
};
use crate::config::TokenizerConfig;

/// A structural JSON token, the unit the analyzer consumes.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    ObjectStart,
    ObjectEnd,
    ArrayStart,
    ArrayEnd,
    PropertyName(String),
    String(String),
    /// Source text of the number; width is chosen by the reader.
    Number(String),
    True,
    False,
    Null,
}

/// The kind of a [`Token`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum TokenKind {
    ObjectStart,
    ObjectEnd,
    ArrayStart,
    ArrayEnd,
    PropertyName,
    String,
    Number,
    True,
    False,
    Null,
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::ObjectStart => TokenKind::ObjectStart,
            Token::ObjectEnd => TokenKind::ObjectEnd,
            Token::ArrayStart => TokenKind::ArrayStart,
            Token::ArrayEnd => TokenKind::ArrayEnd,
            Token::PropertyName(_) => TokenKind::PropertyName,
            Token::String(_) => TokenKind::String,
            Token::Number(_) => TokenKind::Number,
            Token::True => TokenKind::True,
            Token::False => TokenKind::False,
            Token::Null => TokenKind::Null,
        }
    }

    pub(crate) fn from_literal(literal: Literal) -> Self {
        match literal {
            Literal::String(s) => Token::String(s),
            Literal::Number(n) => Token::Number(n),
            Literal::Boolean(true) => Token::True,
            Literal::Boolean(false) => Token::False,
            Literal::Null => Token::Null,
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::ObjectStart => write!(f, "{{"),
            Token::ObjectEnd => write!(f, "}}"),
            Token::ArrayStart => write!(f, "["),
            Token::ArrayEnd => write!(f, "]"),
            Token::PropertyName(name) => write!(f, "{:?}:", name),
            Token::String(s) => write!(f, "{:?}", s),
            Token::Number(n) => write!(f, "{}", n),
            Token::True => write!(f, "true"),
            Token::False => write!(f, "false"),
            Token::Null => write!(f, "null"),
        }
    }
}

/// Raw lexical unit produced before the structural pass.
#[derive(Debug, Clone, PartialEq)]
pub enum Lexeme {
    Delimiter(Delimiter),
    Literal(Literal),
    Comment(String),
    Whitespace,
    Newline,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenSpan {
    pub token: Token,
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl TokenSpan {
    /// Wraps a token that has no source location, e.g. one produced by an
    /// external tokenizer.
    pub fn detached(token: Token) -> Self {
        Self {
            token,
            start: 0,
            end: 0,
            line: 0,
            column: 0,
        }
    }

    pub fn span(&self) -> Span {
        Span {
            start: self.start,
            end: self.end,
            line: self.line,
            column: self.column,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "line: {}, column: {}, start: {}, end: {}",
            self.line, self.column, self.start, self.end
        )
    }
}

#[derive(Debug, Clone)]
pub struct Tokenizer {
    config: TokenizerConfig,
    current_position: usize,
    current_line: usize,
    current_column: usize,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(TokenizerConfig::default())
    }
}

impl Tokenizer {
    pub fn new(config: TokenizerConfig) -> Self {
        Self {
            config,
            current_position: 0,
            current_line: 1,   // 1-based
            current_column: 1, // 1-based
        }
    }

    #[tracing::instrument(level = "debug", skip(self, input))]
    pub fn tokenize(&mut self, input: &str) -> TokenizerResult<Vec<TokenSpan>> {
        let mut tokens = Vec::new();
        let mut structure = Structure::new(&self.config);
        let mut remaining = input;

        while !remaining.is_empty() {
            let span = self.current_span();

            let result = alt((
                parse_whitespace,
                parse_newline,
                parse_comment,
                parse_literal,
                parse_delimiter,
            ))(remaining);

            match result {
                Ok((new_remaining, lexeme)) => {
                    let consumed = &remaining[..(remaining.len() - new_remaining.len())];
                    self.update_position(consumed);
                    let span = Span {
                        end: self.current_position,
                        ..span
                    };

                    match lexeme {
                        Lexeme::Whitespace | Lexeme::Newline => {}
                        Lexeme::Comment(_) if self.config.allow_comments => {}
                        Lexeme::Comment(_) => {
                            let error = TokenizerError::CommentsNotAllowed { span };
                            tracing::error!("{}", error);
                            return Err(error);
                        }
                        Lexeme::Delimiter(_) | Lexeme::Literal(_) => {
                            if let Some(token) = structure.accept(lexeme, &span)? {
                                tokens.push(TokenSpan {
                                    token,
                                    start: span.start,
                                    end: span.end,
                                    line: span.line,
                                    column: span.column,
                                });
                            }
                        }
                    }

                    remaining = new_remaining;
                }
                Err(e) => {
                    let found = remaining.chars().take(20).collect::<String>();
                    let span = Span {
                        end: self.current_position + 1,
                        ..span
                    };
                    let error = match e {
                        nom::Err::Incomplete(e) => TokenizerError::ParseError {
                            message: format!("Incomplete input, {:?}", e),
                            found,
                            span,
                        },
                        nom::Err::Error(e) | nom::Err::Failure(e) => TokenizerError::ParseError {
                            message: nom::error::convert_error(remaining, e).to_string(),
                            found,
                            span,
                        },
                    };
                    tracing::error!("{}", error);
                    return Err(error);
                }
            }
        }

        structure.finish(&self.current_span())?;
        Ok(tokens)
    }

    fn current_span(&self) -> Span {
        Span {
            start: self.current_position,
            end: self.current_position,
            line: self.current_line,
            column: self.current_column,
        }
    }

    fn update_position(&mut self, text: &str) {
        for c in text.chars() {
            self.current_position += c.len_utf8();
            if c == '\n' {
                self.current_line += 1;
                self.current_column = 1;
            } else {
                self.current_column += 1;
            }
        }
    }
}

pub type ParserResult<'a, T> = IResult<&'a str, T, VerboseError<&'a str>>;

pub type TokenizerResult<T> = Result<T, TokenizerError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TokenizerError {
    #[error("Parse error: {message} at position {span}")]
    ParseError {
        message: String,
        found: String,
        span: Span,
    },
    #[error("Unexpected end of input at position {span}")]
    UnexpectedEof { span: Span },
    #[error("Maximum depth {max_depth} exceeded at position {span}")]
    DepthExceeded { max_depth: usize, span: Span },
    #[error("Comments are not allowed at position {span}")]
    CommentsNotAllowed { span: Span },
}
