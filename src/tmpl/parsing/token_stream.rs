//! Bounded look-ahead over the lexer.

use crate::tmpl::lexing::{Lexer, Token, TokenKind};
use std::collections::VecDeque;

/// The grammar never needs to see more than three tokens ahead (`$x :=` with a space in
/// between).
pub const LOOKAHEAD: usize = 3;

/// Pulls tokens from a [`Lexer`] on demand and lets the parser peek a few of them.
///
/// There is no backup: decisions are made by peeking, and a token is only consumed once the
/// parser knows what to do with it.
pub struct TokenStream<'a> {
    lexer: Lexer<'a>,
    buffer: VecDeque<Token>,
}

impl<'a> TokenStream<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lexer: Lexer::new(source),
            buffer: VecDeque::with_capacity(LOOKAHEAD),
        }
    }

    pub fn source(&self) -> &'a str {
        self.lexer.source()
    }

    fn fill(&mut self, count: usize) {
        debug_assert!(count <= LOOKAHEAD, "look-ahead beyond {LOOKAHEAD} tokens");
        while self.buffer.len() < count {
            let token = self.lexer.next_token();
            self.buffer.push_back(token);
        }
    }

    /// The token `n` positions ahead (0 is the next one).
    pub fn peek(&mut self, n: usize) -> &Token {
        self.fill(n + 1);
        &self.buffer[n]
    }

    pub fn peek_kind(&mut self, n: usize) -> TokenKind {
        self.peek(n).kind
    }

    pub fn next(&mut self) -> Token {
        self.fill(1);
        // fill(1) guarantees one buffered token
        self.buffer
            .pop_front()
            .unwrap_or_else(|| self.lexer.next_token())
    }

    /// Drops any Space tokens, then peeks at the next token.
    pub fn peek_non_space(&mut self) -> &Token {
        while self.peek_kind(0) == TokenKind::Space {
            self.next();
        }
        self.peek(0)
    }

    pub fn next_non_space(&mut self) -> Token {
        self.peek_non_space();
        self.next()
    }
}
