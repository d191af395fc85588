use thiserror::Error;

use crate::analyzer::ParseError;
use crate::tokenizer::TokenizerError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Tokenizer error: {0}")]
    Tokenizer(#[from] TokenizerError),

    /// A parse that was required to succeed did not.
    #[error("Parse error at line {line}, column {column}: {source}")]
    Parse {
        #[source]
        source: ParseError,
        line: usize,
        column: usize,
    },

    /// A parser failure with no cursor to locate it.
    #[error("Parse error: {0}")]
    Failed(#[from] ParseError),

    #[error("Config error: {0}")]
    Config(String),
}

pub type InternalResult<T> = Result<T, Error>;

impl Error {
    /// The underlying parser failure, if this error came from the analyzer.
    pub fn parse_error(&self) -> Option<&ParseError> {
        match self {
            Error::Parse { source, .. } | Error::Failed(source) => Some(source),
            _ => None,
        }
    }
}
