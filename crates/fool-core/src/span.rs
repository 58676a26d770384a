//! Source location tracking for diagnostics.
//!
//! Provides [`Span`] so every AST node can report the line it came from.

use std::fmt;

/// A position in the source program.
///
/// Diagnostics only ever print the line; the column is kept for producers
/// that have it (a parser) and is `0` when unknown.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed, `0` when unknown).
    pub col: u32,
}

impl Span {
    /// Create a span from a line and column.
    #[inline]
    pub fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }

    /// Create a span that only knows its line.
    #[inline]
    pub fn line(line: u32) -> Self {
        Self { line, col: 0 }
    }

    /// Whether the column is known.
    #[inline]
    pub fn has_col(&self) -> bool {
        self.col != 0
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_col() {
            write!(f, "{}:{}", self.line, self.col)
        } else {
            write!(f, "{}", self.line)
        }
    }
}
