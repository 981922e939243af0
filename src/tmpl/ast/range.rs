//! Source positions
//!
//!     Nodes only store byte offsets. A [`SourceLocation`] built once per document turns an offset
//!     into a line or a `line:column` [`Position`] with a binary search over line starts, so the
//!     printer can ask "which line is this operand on" for every operand without rescanning the
//!     source.
//!
//!     Lines and columns are 1-based. Columns count bytes from the start of the line.

use serde::Serialize;
use std::fmt;

/// A `line:column` position in a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

/// Byte offset to line/column lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Byte offsets where each line starts
    line_starts: Vec<usize>,
}

impl SourceLocation {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(source.match_indices('\n').map(|(idx, _)| idx + 1));
        Self { line_starts }
    }

    /// 0-based index of the line holding `byte_offset`.
    fn line_index(&self, byte_offset: usize) -> usize {
        self.line_starts
            .binary_search(&byte_offset)
            .unwrap_or_else(|i| i - 1)
    }

    /// 1-based line number of `byte_offset`.
    pub fn line_of(&self, byte_offset: usize) -> usize {
        self.line_index(byte_offset) + 1
    }

    /// Byte offset where the line holding `byte_offset` starts.
    pub fn line_start_of(&self, byte_offset: usize) -> usize {
        self.line_starts[self.line_index(byte_offset)]
    }

    pub fn position(&self, byte_offset: usize) -> Position {
        let line = self.line_index(byte_offset);
        Position::new(line + 1, byte_offset - self.line_starts[line] + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_one_based() {
        let location = SourceLocation::new("ab\ncd\n\nef");
        assert_eq!(location.position(0), Position::new(1, 1));
        assert_eq!(location.position(1), Position::new(1, 2));
        assert_eq!(location.position(3), Position::new(2, 1));
        assert_eq!(location.position(6), Position::new(3, 1));
        assert_eq!(location.position(8), Position::new(4, 2));
    }

    #[test]
    fn line_lookup() {
        let location = SourceLocation::new("one\ntwo\nthree");
        assert_eq!(location.line_of(0), 1);
        assert_eq!(location.line_of(3), 1);
        assert_eq!(location.line_of(4), 2);
        assert_eq!(location.line_of(10), 3);
        assert_eq!(location.line_start_of(10), 8);
        assert_eq!(location.line_start_of(2), 0);
    }

    #[test]
    fn end_of_input_maps_to_last_line() {
        let source = "a\nb";
        let location = SourceLocation::new(source);
        assert_eq!(location.position(source.len()), Position::new(2, 2));
    }

    #[test]
    fn position_display() {
        assert_eq!(Position::new(3, 14).to_string(), "3:14");
    }
}
