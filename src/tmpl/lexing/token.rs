//! Token types shared by the lexer, the parser and the inspection tooling.
//!
//!     The lexer works in two modes. Outside of delimiters it only produces Text tokens and the
//!     delimiters (or a whole Comment). Inside `{{ … }}` it produces the action tokens below.
//!     Whitespace inside an action survives as a Space token: it separates command operands and
//!     the parser needs it to tell `$x :=` apart from `$x` used as an argument.
//!
//!     Delimiter tokens carry the trim markers as they were written (`{{-` and `-}}`). The
//!     formatter re-emits them verbatim, it never adds or drops one.

use serde::Serialize;
use std::fmt;

/// Every kind of token the lexer can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenKind {
    Text,
    Comment,
    LeftDelim,
    RightDelim,
    LeftParen,
    RightParen,
    Pipe,
    Space,
    Identifier,
    Field,
    Variable,
    Dot,
    Nil,
    Bool,
    Number,
    CharConstant,
    Complex,
    String,
    RawString,
    If,
    Else,
    End,
    Range,
    With,
    Define,
    Block,
    Declare,
    Assign,
    Comma,
    Eof,
    Error,
}

impl TokenKind {
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Text => "text",
            TokenKind::Comment => "comment",
            TokenKind::LeftDelim => "left-delim",
            TokenKind::RightDelim => "right-delim",
            TokenKind::LeftParen => "left-paren",
            TokenKind::RightParen => "right-paren",
            TokenKind::Pipe => "pipe",
            TokenKind::Space => "space",
            TokenKind::Identifier => "identifier",
            TokenKind::Field => "field",
            TokenKind::Variable => "variable",
            TokenKind::Dot => "dot",
            TokenKind::Nil => "nil",
            TokenKind::Bool => "bool",
            TokenKind::Number => "number",
            TokenKind::CharConstant => "char-constant",
            TokenKind::Complex => "complex",
            TokenKind::String => "string",
            TokenKind::RawString => "raw-string",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::End => "end",
            TokenKind::Range => "range",
            TokenKind::With => "with",
            TokenKind::Define => "define",
            TokenKind::Block => "block",
            TokenKind::Declare => "declare",
            TokenKind::Assign => "assign",
            TokenKind::Comma => "comma",
            TokenKind::Eof => "eof",
            TokenKind::Error => "error",
        }
    }

    /// Keywords are shown as `<word>` in diagnostics.
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::If
                | TokenKind::Else
                | TokenKind::End
                | TokenKind::Range
                | TokenKind::With
                | TokenKind::Define
                | TokenKind::Block
                | TokenKind::Nil
                | TokenKind::Dot
        )
    }

    /// Tokens that can start an operand of a command.
    pub fn starts_operand(self) -> bool {
        matches!(
            self,
            TokenKind::Bool
                | TokenKind::CharConstant
                | TokenKind::Complex
                | TokenKind::Dot
                | TokenKind::Field
                | TokenKind::Identifier
                | TokenKind::Number
                | TokenKind::Nil
                | TokenKind::RawString
                | TokenKind::String
                | TokenKind::Variable
                | TokenKind::LeftParen
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Trim markers attached to a delimited construct.
///
/// `left` is `{{-`, `right` is `-}}`. Both ask the template engine to strip the adjacent
/// whitespace at render time, which is why the formatter must preserve them exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Trim {
    pub left: bool,
    pub right: bool,
}

impl Trim {
    pub fn new(left: bool, right: bool) -> Self {
        Self { left, right }
    }

    pub fn left_delim(self) -> &'static str {
        if self.left {
            "{{- "
        } else {
            "{{ "
        }
    }

    pub fn right_delim(self) -> &'static str {
        if self.right {
            " -}}"
        } else {
            " }}"
        }
    }

    /// Closing delimiter for an action whose closing braces sit on their own line.
    pub fn right_delim_no_space(self) -> &'static str {
        if self.right {
            "-}}"
        } else {
            "}}"
        }
    }
}

/// A single lexed token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Raw source text of the token. For Error tokens, the error message.
    pub value: String,
    /// Byte offset of the token start in the source.
    pub pos: usize,
    /// 1-based source line of the token start.
    pub line: usize,
    pub trim: Trim,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, pos: usize, line: usize) -> Self {
        Self {
            kind,
            value: value.into(),
            pos,
            line,
            trim: Trim::default(),
        }
    }

    pub fn with_trim(mut self, trim: Trim) -> Self {
        self.trim = trim;
        self
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => f.write_str("EOF"),
            TokenKind::Error => f.write_str(&self.value),
            kind if kind.is_keyword() => write!(f, "<{}>", self.value),
            _ if self.value.chars().count() > 10 => {
                let head: String = self.value.chars().take(10).collect();
                write!(f, "{:?}...", head)
            }
            _ => write!(f, "{:?}", self.value),
        }
    }
}
