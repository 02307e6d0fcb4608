//! Cursor positions and the spans between them.
//!
//! `index` is a byte offset into the UTF-8 input so that it can be used for
//! slicing and for `miette` source spans directly. `line` and `column` are
//! 1-based and intended for humans; `column` counts characters, not bytes.

use serde::{Deserialize, Serialize};

/// A location in the input.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub index: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// The position of the first character of any input.
    pub const fn start() -> Self {
        Self {
            index: 0,
            line: 1,
            column: 1,
        }
    }

    /// Returns the position reached after consuming `consumed`, which must be
    /// the text starting at `self`.
    ///
    /// Every `'\n'` moves to the next line and resets the column to 1; any
    /// other character (including `'\r'`) advances the column by one.
    pub fn advanced_over(&self, consumed: &str) -> Self {
        let mut line = self.line;
        let mut column = self.column;

        match consumed.rfind('\n') {
            Some(last_newline) => {
                line += consumed.matches('\n').count();
                column = 1 + consumed[last_newline + 1..].chars().count();
            }
            None => column += consumed.chars().count(),
        }

        Self {
            index: self.index + consumed.len(),
            line,
            column,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A span between two positions, `to.index >= from.index`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub from: Position,
    pub to: Position,
}

impl Range {
    pub fn new(from: Position, to: Position) -> Self {
        debug_assert!(to.index >= from.index, "range end precedes its start");
        Self { from, to }
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> usize {
        self.to.index - self.from.index
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Converts to a `miette` span for diagnostics.
    pub fn to_source_span(&self) -> miette::SourceSpan {
        miette::SourceSpan::from(self.from.index..self.to.index)
    }
}

/// A parsed value paired with the span of input it was parsed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker<T> {
    pub value: T,
    pub range: Range,
}

/// A [`Marker`] that also records which rule produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedMarker<T> {
    pub value: T,
    pub name: String,
    pub range: Range,
}

impl<T> Marker<T> {
    pub fn named(self, name: impl Into<String>) -> NamedMarker<T> {
        NamedMarker {
            value: self.value,
            name: name.into(),
            range: self.range,
        }
    }
}
