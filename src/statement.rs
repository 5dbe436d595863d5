use serde::{Deserialize, Serialize};

/// Column sentinel meaning "end of the line, whatever its length".
pub const END_OF_LINE: usize = usize::MAX;

/// Range as reported by the parser: lines are 1-indexed, columns are byte
/// offsets into the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

impl SourceLocation {
    pub fn new(start_line: usize, start_column: usize, end_line: usize, end_column: usize) -> Self {
        Self {
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }

    /// Spans from the start of `self` to the end of `other`.
    pub fn through(&self, other: &SourceLocation) -> SourceLocation {
        SourceLocation {
            start_line: self.start_line,
            start_column: self.start_column,
            end_line: other.end_line,
            end_column: other.end_column,
        }
    }

    /// Inclusive 0-indexed line span, as addressed by the buffer.
    pub fn buffer_lines(&self) -> (usize, usize) {
        (
            self.start_line.saturating_sub(1),
            self.end_line.saturating_sub(1),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementKind {
    /// An executing call in active code.
    Live,
    /// A call that only exists inside a comment.
    Ghost,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Statement {
    pub location: SourceLocation,
    pub kind: StatementKind,
}

impl Statement {
    pub fn live(location: SourceLocation) -> Self {
        Self {
            location,
            kind: StatementKind::Live,
        }
    }

    pub fn ghost(location: SourceLocation) -> Self {
        Self {
            location,
            kind: StatementKind::Ghost,
        }
    }
}

/// 0-indexed buffer coordinate. `column` may be [`END_OF_LINE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn line_start(line: usize) -> Self {
        Self { line, column: 0 }
    }

    pub fn line_end(line: usize) -> Self {
        Self {
            line,
            column: END_OF_LINE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineRange {
    pub start: Position,
    pub end: Position,
}

impl LineRange {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Whole-line range from column 0 of `first` to the end of `last`.
    pub fn lines(first: usize, last: usize) -> Self {
        Self {
            start: Position::line_start(first),
            end: Position::line_end(last),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditAction {
    Replace(String),
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOp {
    pub range: LineRange,
    pub action: EditAction,
}

impl EditOp {
    pub fn replace(range: LineRange, text: impl Into<String>) -> Self {
        Self {
            range,
            action: EditAction::Replace(text.into()),
        }
    }

    pub fn delete(range: LineRange) -> Self {
        Self {
            range,
            action: EditAction::Delete,
        }
    }
}
