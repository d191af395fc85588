//! # Analyzer
//!
//! Parser combinators over a tokenized JSON document.
//!
//! - [`core`]: the [`Parser`] trait, [`ParseError`] and the `parse` /
//!   `try_parse` entry points
//! - [`cursor`]: the copyable reader parsers advance
//! - [`combinators`] and [`prelude`]: composition
//! - [`parsers`]: token and scalar primitives
//! - [`object`]: folding objects into aggregates through per-property updaters

pub mod combinators;
pub mod core;
pub mod cursor;
pub mod object;
pub mod parsers;
pub mod prelude;
pub mod result;

pub use core::{parse, try_parse, BoxedParser, ParseError, ParseResult, Parser, SharedParser};
pub use cursor::{Cursor, TokenBuffer};
pub use object::{Updater, UpdaterExt};
pub use result::ResultExt;
