//! Primitive parsers over single tokens and common value shapes.

pub mod common;
pub mod scalars;
pub mod tokens;

pub use common::*;
pub use scalars::*;
pub use tokens::*;
