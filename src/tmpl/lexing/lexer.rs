//! Two-mode template lexer.
//!
//! In text mode the lexer emits the raw span up to the next `{{`. In action mode it handles the
//! context-sensitive pieces itself (delimiters, trim markers, whitespace, parenthesis depth) and
//! delegates everything else to the logos table in [`lexeme`](super::lexeme).

use super::lexeme::{LexicalError, Lexeme, NumberShape};
use super::token::{Token, TokenKind, Trim};
use logos::Logos;

const LEFT_DELIM: &str = "{{";
const RIGHT_DELIM: &str = "}}";
const COMMENT_OPEN: &str = "/*";
const COMMENT_CLOSE: &str = "*/";

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// `{{-` needs a following whitespace character to be a trim marker, otherwise `{{-3}}` would
/// lose its sign.
fn has_left_trim_marker(rest: &str) -> bool {
    let mut chars = rest.chars();
    chars.next() == Some('-') && chars.next().is_some_and(is_space)
}

/// One whitespace character followed by `-}}`.
fn has_right_trim_marker(rest: &str) -> bool {
    let mut chars = rest.chars();
    chars.next().is_some_and(is_space) && chars.as_str().starts_with("-}}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Text,
    Action,
    Done,
}

/// Streaming lexer over a template source.
///
/// Yields tokens until it has produced either an Eof or an Error token; malformed input ends
/// the stream.
pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    line: usize,
    mode: Mode,
    paren_depth: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            mode: Mode::Text,
            paren_depth: 0,
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Produces the next token. Once the stream has ended this keeps returning Eof.
    pub fn next_token(&mut self) -> Token {
        match self.mode {
            Mode::Text => self.lex_text(),
            Mode::Action => self.lex_inside_action(),
            Mode::Done => Token::new(TokenKind::Eof, "", self.pos, self.line),
        }
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    /// Emits the next `len` bytes as a token of `kind` and advances past them.
    fn emit(&mut self, kind: TokenKind, len: usize) -> Token {
        let value = &self.source[self.pos..self.pos + len];
        let token = Token::new(kind, value, self.pos, self.line);
        self.advance(len);
        token
    }

    fn advance(&mut self, len: usize) {
        let consumed = &self.source[self.pos..self.pos + len];
        self.line += consumed.matches('\n').count();
        self.pos += len;
    }

    fn error(&mut self, message: impl Into<String>) -> Token {
        self.mode = Mode::Done;
        Token::new(TokenKind::Error, message, self.pos, self.line)
    }

    fn lex_text(&mut self) -> Token {
        match self.rest().find(LEFT_DELIM) {
            Some(0) => self.lex_left_delim(),
            Some(len) => self.emit(TokenKind::Text, len),
            None if self.rest().is_empty() => {
                self.mode = Mode::Done;
                Token::new(TokenKind::Eof, "", self.pos, self.line)
            }
            None => self.emit(TokenKind::Text, self.rest().len()),
        }
    }

    fn lex_left_delim(&mut self) -> Token {
        let after_delim = &self.rest()[LEFT_DELIM.len()..];
        let trim_left = has_left_trim_marker(after_delim);
        // The marker's own whitespace character belongs to the delimiter only for comment
        // detection; inside an action it stays a Space token.
        let marker_len = if trim_left { 2 } else { 0 };
        if after_delim[marker_len..].starts_with(COMMENT_OPEN) {
            return self.lex_comment(trim_left);
        }

        let delim_len = LEFT_DELIM.len() + usize::from(trim_left);
        self.mode = Mode::Action;
        self.paren_depth = 0;
        self.emit(TokenKind::LeftDelim, delim_len)
            .with_trim(Trim::new(trim_left, false))
    }

    fn lex_comment(&mut self, trim_left: bool) -> Token {
        let rest = self.rest();
        let body_start = LEFT_DELIM.len() + if trim_left { 2 } else { 0 } + COMMENT_OPEN.len();
        let Some(close) = rest[body_start..].find(COMMENT_CLOSE) else {
            return self.error("unclosed comment");
        };
        let after_close = body_start + close + COMMENT_CLOSE.len();

        let tail = &rest[after_close..];
        let (trim_right, delim_start) = if tail.starts_with(RIGHT_DELIM) {
            (false, after_close)
        } else if has_right_trim_marker(tail) {
            let space_len = tail.chars().next().map_or(0, char::len_utf8);
            (true, after_close + space_len + 1)
        } else {
            return self.error("comment ends before closing delimiter");
        };

        // The body is everything between the braces, trim markers included.
        let body = &rest[LEFT_DELIM.len()..delim_start];
        let token = Token::new(TokenKind::Comment, body, self.pos, self.line)
            .with_trim(Trim::new(trim_left, trim_right));
        self.advance(delim_start + RIGHT_DELIM.len());
        token
    }

    fn lex_inside_action(&mut self) -> Token {
        let rest = self.rest();

        let right_delim_len = if rest.starts_with(RIGHT_DELIM) {
            Some(RIGHT_DELIM.len())
        } else if has_right_trim_marker(rest) {
            rest.chars()
                .next()
                .map(|c| c.len_utf8() + 1 + RIGHT_DELIM.len())
        } else {
            None
        };
        if let Some(len) = right_delim_len {
            if self.paren_depth > 0 {
                return self.error("unclosed left paren");
            }
            let trim_right = len > RIGHT_DELIM.len();
            self.mode = Mode::Text;
            let mut token = self
                .emit(TokenKind::RightDelim, len)
                .with_trim(Trim::new(false, trim_right));
            token.value = token.value.trim_start().to_string();
            return token;
        }

        let Some(first) = rest.chars().next() else {
            return self.error("unclosed action");
        };

        if is_space(first) {
            return self.lex_space();
        }

        let mut lexemes = Lexeme::lexer(rest);
        let lexeme = match lexemes.next() {
            Some(Ok(lexeme)) => lexeme,
            Some(Err(LexicalError::Unrecognized)) | None => {
                return self.error(format!(
                    "unrecognized character in action: U+{:04X} {:?}",
                    first as u32, first
                ));
            }
            Some(Err(err)) => return self.error(err.to_string()),
        };
        let len = lexemes.span().end;

        let kind = match lexeme {
            Lexeme::LeftParen => {
                self.paren_depth += 1;
                TokenKind::LeftParen
            }
            Lexeme::RightParen => {
                if self.paren_depth == 0 {
                    return self.error("unexpected right paren");
                }
                self.paren_depth -= 1;
                TokenKind::RightParen
            }
            Lexeme::Pipe => TokenKind::Pipe,
            Lexeme::Declare => TokenKind::Declare,
            Lexeme::Assign => TokenKind::Assign,
            Lexeme::Comma => TokenKind::Comma,
            Lexeme::Dot => TokenKind::Dot,
            Lexeme::Field => TokenKind::Field,
            Lexeme::Variable => TokenKind::Variable,
            Lexeme::Word => classify_word(&rest[..len]),
            Lexeme::Number(NumberShape::Real) => TokenKind::Number,
            Lexeme::Number(NumberShape::Complex) => TokenKind::Complex,
            Lexeme::QuotedString => TokenKind::String,
            Lexeme::RawString => TokenKind::RawString,
            Lexeme::CharConstant => TokenKind::CharConstant,
        };
        self.emit(kind, len)
    }

    /// A whitespace run. If the run ends in a trim marker, its last character is left for the
    /// right delimiter.
    fn lex_space(&mut self) -> Token {
        let rest = self.rest();
        let run = rest
            .char_indices()
            .find(|(_, c)| !is_space(*c))
            .map_or(rest.len(), |(idx, _)| idx);
        let mut len = run;
        if rest[run..].starts_with("-}}") {
            len = rest[..run]
                .char_indices()
                .last()
                .map_or(run, |(idx, _)| idx);
        }
        self.emit(TokenKind::Space, len)
    }
}

fn classify_word(word: &str) -> TokenKind {
    match word {
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "end" => TokenKind::End,
        "range" => TokenKind::Range,
        "with" => TokenKind::With,
        "define" => TokenKind::Define,
        "block" => TokenKind::Block,
        "nil" => TokenKind::Nil,
        "true" | "false" => TokenKind::Bool,
        _ => TokenKind::Identifier,
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.mode == Mode::Done {
            return None;
        }
        Some(self.next_token())
    }
}
