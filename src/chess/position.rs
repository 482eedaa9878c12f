use serde::{Deserialize, Serialize};
use std::fmt;

use crate::chess::piece::PieceKind;

/// A square on the board. Rows and columns run 1..=8, row 1 being
/// White's back rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i8,
    pub col: i8,
}

impl Position {
    pub fn new(row: i8, col: i8) -> Self {
        Position { row, col }
    }

    /// The square offset from this one, which may lie off the board.
    pub fn offset(self, d_row: i8, d_col: i8) -> Position {
        Position {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }

    pub fn on_board(self) -> bool {
        (1..=8).contains(&self.row) && (1..=8).contains(&self.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// A move from one square to another. `promotion` is set only when a
/// pawn move ends on the opposite back rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChessMove {
    pub start: Position,
    pub end: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<PieceKind>,
}

impl ChessMove {
    pub fn new(start: Position, end: Position) -> Self {
        ChessMove {
            start,
            end,
            promotion: None,
        }
    }

    pub fn promoting(start: Position, end: Position, kind: PieceKind) -> Self {
        ChessMove {
            start,
            end,
            promotion: Some(kind),
        }
    }
}

impl fmt::Display for ChessMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.start, self.end)?;
        if let Some(kind) = self.promotion {
            write!(f, " promoting to {:?}", kind)?;
        }
        Ok(())
    }
}
