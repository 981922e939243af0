//! Logos definition of the tokens that can appear inside an action.
//!
//! Delimiters and whitespace are handled by the [`Lexer`](super::lexer::Lexer) itself because
//! they depend on context (the trim marker ` -}}` swallows one whitespace character). Everything
//! else inside `{{ … }}` goes through this table.

use logos::Logos;
use std::fmt;

/// Failures raised while matching a single lexeme.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LexicalError {
    /// No rule matched at the current position.
    #[default]
    Unrecognized,
    BadNumber(String),
    UnterminatedQuotedString,
    UnterminatedRawString,
    UnterminatedCharConstant,
}

impl fmt::Display for LexicalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexicalError::Unrecognized => write!(f, "unrecognized character in action"),
            LexicalError::BadNumber(text) => write!(f, "bad number syntax: {:?}", text),
            LexicalError::UnterminatedQuotedString => write!(f, "unterminated quoted string"),
            LexicalError::UnterminatedRawString => write!(f, "unterminated raw quoted string"),
            LexicalError::UnterminatedCharConstant => {
                write!(f, "unterminated character constant")
            }
        }
    }
}

impl std::error::Error for LexicalError {}

/// Real numbers and complex literals share a scanner; the callback reports which one it saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberShape {
    Real,
    Complex,
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(error = LexicalError)]
pub enum Lexeme {
    #[token("(")]
    LeftParen,

    #[token(")")]
    RightParen,

    #[token("|")]
    Pipe,

    #[token(":=")]
    Declare,

    #[token("=")]
    Assign,

    #[token(",")]
    Comma,

    #[token(".")]
    Dot,

    #[regex(r"\.[_\p{L}][_\p{L}\p{Nd}]*")]
    Field,

    #[regex(r"\$[_\p{L}\p{Nd}]*")]
    Variable,

    /// Identifiers and keywords; the lexer classifies the word afterwards.
    #[regex(r"[_\p{L}][_\p{L}\p{Nd}]*")]
    Word,

    #[regex(r"[+-]?[0-9]", number)]
    #[regex(r"[+-]?\.[0-9]", number)]
    Number(NumberShape),

    #[token("\"", quoted_string)]
    QuotedString,

    #[token("`", raw_string)]
    RawString,

    #[token("'", char_constant)]
    CharConstant,
}

fn number(lex: &mut logos::Lexer<Lexeme>) -> Result<NumberShape, LexicalError> {
    let start = lex.span().start;
    let text = &lex.source()[start..];

    let (mut end, ok) = scan_number(text);
    if !ok {
        return Err(LexicalError::BadNumber(text[..end].to_string()));
    }

    let mut shape = NumberShape::Real;
    if matches!(text.as_bytes().get(end), Some(b'+' | b'-')) {
        let (imaginary, ok) = scan_number(&text[end..]);
        end += imaginary;
        if !ok || !text[..end].ends_with('i') {
            return Err(LexicalError::BadNumber(text[..end].to_string()));
        }
        shape = NumberShape::Complex;
    }

    lex.bump(end - lex.slice().len());
    Ok(shape)
}

fn quoted_string(lex: &mut logos::Lexer<Lexeme>) -> Result<(), LexicalError> {
    let len = scan_quoted(lex.remainder(), '"').ok_or(LexicalError::UnterminatedQuotedString)?;
    lex.bump(len);
    Ok(())
}

fn char_constant(lex: &mut logos::Lexer<Lexeme>) -> Result<(), LexicalError> {
    let len = scan_quoted(lex.remainder(), '\'').ok_or(LexicalError::UnterminatedCharConstant)?;
    lex.bump(len);
    Ok(())
}

fn raw_string(lex: &mut logos::Lexer<Lexeme>) -> Result<(), LexicalError> {
    let close = lex
        .remainder()
        .find('`')
        .ok_or(LexicalError::UnterminatedRawString)?;
    lex.bump(close + 1);
    Ok(())
}

/// Length of the rest of a quoted literal, closing quote included.
///
/// Escapes are skipped but not validated here. A newline or the end of input before the
/// closing quote means the literal is unterminated.
fn scan_quoted(rest: &str, quote: char) -> Option<usize> {
    let mut chars = rest.char_indices();
    while let Some((idx, c)) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some((_, '\n')) | None => return None,
                Some(_) => {}
            },
            '\n' => return None,
            c if c == quote => return Some(idx + c.len_utf8()),
            _ => {}
        }
    }
    None
}

/// Scans one real number from the start of `text`.
///
/// Returns the number of bytes consumed and whether the literal is well formed. A number
/// immediately followed by an alphanumeric character is malformed; the offending character is
/// included in the consumed length so diagnostics can show it.
pub(crate) fn scan_number(text: &str) -> (usize, bool) {
    const DECIMAL: &[u8] = b"0123456789_";
    const HEX: &[u8] = b"0123456789abcdefABCDEF_";
    const OCTAL: &[u8] = b"01234567_";
    const BINARY: &[u8] = b"01_";

    let bytes = text.as_bytes();
    let mut cursor = 0;

    accept(bytes, &mut cursor, b"+-");
    let mut digits = DECIMAL;
    if accept(bytes, &mut cursor, b"0") {
        if accept(bytes, &mut cursor, b"xX") {
            digits = HEX;
        } else if accept(bytes, &mut cursor, b"oO") {
            digits = OCTAL;
        } else if accept(bytes, &mut cursor, b"bB") {
            digits = BINARY;
        }
    }
    accept_run(bytes, &mut cursor, digits);
    if accept(bytes, &mut cursor, b".") {
        accept_run(bytes, &mut cursor, digits);
    }
    if digits == DECIMAL && accept(bytes, &mut cursor, b"eE") {
        accept(bytes, &mut cursor, b"+-");
        accept_run(bytes, &mut cursor, DECIMAL);
    }
    if digits == HEX && accept(bytes, &mut cursor, b"pP") {
        accept(bytes, &mut cursor, b"+-");
        accept_run(bytes, &mut cursor, DECIMAL);
    }
    accept(bytes, &mut cursor, b"i");

    match text[cursor..].chars().next() {
        Some(c) if c == '_' || c.is_alphanumeric() => (cursor + c.len_utf8(), false),
        _ => (cursor, true),
    }
}

fn accept(bytes: &[u8], cursor: &mut usize, set: &[u8]) -> bool {
    match bytes.get(*cursor) {
        Some(b) if set.contains(b) => {
            *cursor += 1;
            true
        }
        _ => false,
    }
}

fn accept_run(bytes: &[u8], cursor: &mut usize, set: &[u8]) {
    while accept(bytes, cursor, set) {}
}
