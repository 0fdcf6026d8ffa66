//! Source positions, offsets and spans
//!
//! Lines and columns are zero-based throughout. An `Offset` is a relative
//! distance that can be added to a `Position`; adding an offset that spans
//! one or more lines resets the column to the offset's own column, which is
//! exactly how emitted text advances a source-map cursor.

use std::fmt;
use std::ops::{Add, AddAssign};

/// Absolute position inside one source file of the include table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Index into the compilation context's include table
    pub file: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(file: usize, line: usize, column: usize) -> Self {
        Self { file, line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Relative distance between two positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Offset {
    pub line: usize,
    pub column: usize,
}

impl Offset {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Measure the offset a chunk of emitted text advances the cursor by.
    /// Newlines bump the line count and reset the column.
    pub fn of_text(text: &str) -> Self {
        let mut line = 0;
        let mut column = 0;
        for ch in text.chars() {
            if ch == '\n' {
                line += 1;
                column = 0;
            } else {
                column += 1;
            }
        }
        Self { line, column }
    }

    pub fn is_zero(&self) -> bool {
        self.line == 0 && self.column == 0
    }
}

impl Add for Offset {
    type Output = Offset;

    fn add(self, rhs: Offset) -> Offset {
        Offset {
            line: self.line + rhs.line,
            column: if rhs.line > 0 {
                rhs.column
            } else {
                self.column + rhs.column
            },
        }
    }
}

impl Add<Offset> for Position {
    type Output = Position;

    fn add(self, rhs: Offset) -> Position {
        Position {
            file: self.file,
            line: self.line + rhs.line,
            column: if rhs.line > 0 {
                rhs.column
            } else {
                self.column + rhs.column
            },
        }
    }
}

impl AddAssign<Offset> for Position {
    fn add_assign(&mut self, rhs: Offset) {
        *self = *self + rhs;
    }
}

/// The literal span a node was parsed from. Immutable after construction;
/// every AST, selector and value node carries one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceSpan {
    /// Start of the span
    pub position: Position,
    /// Extent of the span, added to `position` to reach its end
    pub offset: Offset,
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.position)
    }
}

impl SourceSpan {
    pub fn new(position: Position, offset: Offset) -> Self {
        Self { position, offset }
    }

    /// Span for nodes synthesized by a transform rather than parsed.
    pub fn synthetic() -> Self {
        Self {
            position: Position::new(0, 0, 0),
            offset: Offset::default(),
        }
    }

    pub fn file(&self) -> usize {
        self.position.file
    }

    pub fn end(&self) -> Position {
        self.position + self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_of_text() {
        assert_eq!(Offset::of_text(""), Offset::new(0, 0));
        assert_eq!(Offset::of_text("abc"), Offset::new(0, 3));
        assert_eq!(Offset::of_text("ab\nc"), Offset::new(1, 1));
        assert_eq!(Offset::of_text("a\n\n"), Offset::new(2, 0));
    }

    #[test]
    fn test_position_plus_offset_same_line() {
        let pos = Position::new(0, 3, 7);
        let moved = pos + Offset::new(0, 4);
        assert_eq!(moved, Position::new(0, 3, 11));
    }

    #[test]
    fn test_position_plus_offset_line_break_resets_column() {
        let pos = Position::new(2, 3, 7);
        let moved = pos + Offset::new(2, 5);
        assert_eq!(moved, Position::new(2, 5, 5));
    }

    #[test]
    fn test_offset_addition_matches_text_concatenation() {
        let a = "foo\nbar";
        let b = "baz\nqux line";
        let combined = Offset::of_text(&format!("{}{}", a, b));
        assert_eq!(Offset::of_text(a) + Offset::of_text(b), combined);
    }

    #[test]
    fn test_span_end() {
        let span = SourceSpan::new(Position::new(0, 1, 2), Offset::new(0, 10));
        assert_eq!(span.end(), Position::new(0, 1, 12));
    }
}
