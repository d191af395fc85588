use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path};

use crate::{Error, InternalResult};

/// Options threaded through every parser invocation.
///
/// Parsers never interpret most of these themselves; they are handed on to
/// the tokenizer and to the fallback deserializer behind
/// [`parse_type`](crate::analyzer::parsers::parse_type).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParseConfig {
    #[serde(default)]
    pub tokenizer: TokenizerConfig,

    /// Nesting limit for values materialised by the fallback deserializer.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Compare expected property names without regard to ASCII case.
    #[serde(default)]
    pub case_insensitive_properties: bool,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            tokenizer: TokenizerConfig::default(),
            max_depth: default_max_depth(),
            case_insensitive_properties: false,
        }
    }
}

impl ParseConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> InternalResult<Self> {
        from_file(path)
    }

    pub fn from_str(s: &str) -> InternalResult<Self> {
        from_str(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenizerConfig {
    #[serde(default)]
    pub allow_comments: bool,

    #[serde(default)]
    pub allow_trailing_commas: bool,

    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            allow_comments: false,
            allow_trailing_commas: false,
            max_depth: default_max_depth(),
        }
    }
}

pub fn from_file<T: for<'de> Deserialize<'de>, P: AsRef<Path>>(path: P) -> InternalResult<T> {
    let file = File::open(path)
        .map_err(|e| Error::Config(format!("Failed to open config file: {}", e)))?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader)
        .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))?;
    Ok(config)
}

pub fn from_str<T: for<'de> Deserialize<'de>>(s: &str) -> InternalResult<T> {
    let config = serde_json::from_str(s)
        .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
    Ok(config)
}

fn default_max_depth() -> usize {
    64
}
