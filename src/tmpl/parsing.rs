//! Parsing
//!
//!     Recursive descent over the token stream with a three-token look-ahead. Literal handling
//!     (number typing, string unquoting) lives in its own modules so the grammar code stays
//!     about structure.

pub mod number;
pub mod parser;
pub mod token_stream;
pub mod unquote;

pub use parser::{Parser, MAX_NESTING_DEPTH};

use crate::tmpl::ast::{ParseResult, Template};

/// Parses a whole template.
pub fn parse(source: &str) -> ParseResult<Template> {
    Parser::new(source).parse()
}
