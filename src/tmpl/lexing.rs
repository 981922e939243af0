//! Lexing
//!
//!     Turns template source into a flat token stream. The parser pulls tokens lazily from a
//!     [`Lexer`]; [`tokenize`] collects the whole stream for inspection and tests.

pub mod lexeme;
pub mod lexer;
pub mod token;

pub use lexer::Lexer;
pub use token::{Token, TokenKind, Trim};

/// Lexes the whole source. The last token is either Eof or the Error that stopped lexing.
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).collect()
}
