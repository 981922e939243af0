//! Error types for parsing templates

use crate::tmpl::ast::range::Position;
use crate::tmpl::config::DiagnosticsConfig;
use std::fmt;

/// What went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The lexer produced an error token.
    Lexical {
        message: String,
        /// Line of the enclosing `{{` when it differs from the error line.
        action_line: Option<usize>,
    },
    UnexpectedEof,
    UnexpectedToken {
        found: String,
        context: String,
    },
    /// `{{ end }}` or `{{ else }}` with no open branch.
    UnexpectedControl {
        keyword: String,
    },
    MissingValue {
        context: String,
    },
    NonExecutableCommand {
        stage: usize,
    },
    EmptyCommand,
    FieldOnLiteral {
        term: String,
    },
    TooManyDeclarations {
        context: String,
    },
    RangeCanOnlyInitializeVariables,
    IntegerOverflow {
        text: String,
    },
    IllegalNumber {
        text: String,
    },
    MalformedCharConstant {
        text: String,
    },
    InvalidSyntax {
        text: String,
    },
    NestingTooDeep {
        limit: usize,
    },
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Lexical {
                message,
                action_line: Some(line),
            } => write!(f, "{} in action started at line {}", message, line),
            ErrorKind::Lexical { message, .. } => f.write_str(message),
            ErrorKind::UnexpectedEof => f.write_str("unexpected EOF"),
            ErrorKind::UnexpectedToken { found, context } => {
                write!(f, "unexpected {} in {}", found, context)
            }
            ErrorKind::UnexpectedControl { keyword } => write!(f, "unexpected {{{{ {} }}}}", keyword),
            ErrorKind::MissingValue { context } => write!(f, "missing value for {}", context),
            ErrorKind::NonExecutableCommand { stage } => {
                write!(f, "non executable command in pipeline stage {}", stage)
            }
            ErrorKind::EmptyCommand => f.write_str("empty command"),
            ErrorKind::FieldOnLiteral { term } => write!(f, "unexpected . after term {:?}", term),
            ErrorKind::TooManyDeclarations { context } => {
                write!(f, "too many declarations in {}", context)
            }
            ErrorKind::RangeCanOnlyInitializeVariables => {
                f.write_str("range can only initialize variables")
            }
            ErrorKind::IntegerOverflow { text } => write!(f, "integer overflow: {:?}", text),
            ErrorKind::IllegalNumber { text } => write!(f, "illegal number syntax: {:?}", text),
            ErrorKind::MalformedCharConstant { text } => {
                write!(f, "malformed character constant: {}", text)
            }
            ErrorKind::InvalidSyntax { text } => write!(f, "invalid syntax: {}", text),
            ErrorKind::NestingTooDeep { limit } => {
                write!(f, "max nesting depth of {} exceeded", limit)
            }
        }
    }
}

/// A failed parse: where, what, and the source text of the offending token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub position: Position,
    pub kind: ErrorKind,
    /// Raw text of the token the parser stopped at. Empty at end of input.
    pub snippet: String,
}

impl ParseError {
    pub fn new(position: Position, kind: ErrorKind, snippet: impl Into<String>) -> Self {
        Self {
            position,
            kind,
            snippet: snippet.into(),
        }
    }

    /// Multi-line report for terminals.
    ///
    /// The first line is the `Display` form. Depending on `diagnostics`, the offending snippet is
    /// shown raw or Debug-quoted (quoting makes embedded newlines and tabs visible), and the
    /// surrounding source lines are appended.
    pub fn render(&self, source: &str, diagnostics: &DiagnosticsConfig) -> String {
        let mut report = self.to_string();
        if !self.snippet.is_empty() {
            report.push_str("\n  near: ");
            if diagnostics.quote_text {
                report.push_str(&format!("{:?}", self.snippet));
            } else {
                report.push_str(&self.snippet);
            }
        }
        if diagnostics.source_context {
            report.push('\n');
            report.push_str(&format_source_context(source, self.position.line));
        }
        report
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "template: {}: {}", self.position, self.kind)
    }
}

impl std::error::Error for ParseError {}

pub type ParseResult<T> = Result<T, ParseError>;

/// Numbered source lines around `line` (1-based), the failing one marked with `>>`.
pub fn format_source_context(source: &str, line: usize) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let error_line = line.saturating_sub(1);

    let start_line = error_line.saturating_sub(2);
    let end_line = (error_line + 3).min(lines.len());

    let mut context = String::new();
    for (line_num, text) in lines.iter().enumerate().take(end_line).skip(start_line) {
        let marker = if line_num == error_line { ">>" } else { "  " };
        context.push_str(&format!("{} {:3} | {}\n", marker, line_num + 1, text));
    }
    context
}
