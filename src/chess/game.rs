use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

use crate::chess::board::Board;
use crate::chess::piece::{Color, Piece};
use crate::chess::position::{ChessMove, Position};

/// Why a move was rejected by `Game::make_move`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    NoPieceAtSource,
    WrongTurn,
    IllegalMove,
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::NoPieceAtSource => write!(f, "there is no piece at the start square"),
            MoveError::WrongTurn => write!(f, "it is not that color's turn"),
            MoveError::IllegalMove => write!(f, "illegal move"),
        }
    }
}

impl Error for MoveError {}

/// One chess game: a board plus the color to move. Whether play has
/// already stopped is tracked by the surrounding game record, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    board: Board,
    turn: Color,
}

impl Game {
    pub fn new() -> Self {
        Game {
            board: Board::standard(),
            turn: Color::White,
        }
    }

    pub fn from_board(board: Board, turn: Color) -> Self {
        Game { board, turn }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    /// Legal moves for the piece at `start`; empty when the square is
    /// empty. Each pseudo-legal move is simulated on a scratch board
    /// (capture lifted, piece moved, both restored afterwards) and kept
    /// only if the mover's king ends up unattacked. No ordering
    /// guarantee.
    pub fn valid_moves(&self, start: Position) -> Vec<ChessMove> {
        if !start.on_board() {
            return Vec::new();
        }
        let piece = match self.board.piece_at(start) {
            Some(piece) => piece,
            None => return Vec::new(),
        };

        let mut scratch = self.board;
        let mut legal = Vec::new();
        for mv in piece.pseudo_moves(&self.board, start) {
            let captured = scratch.piece_at(mv.end);
            scratch.set(start, None);
            scratch.set(mv.end, Some(piece));

            if !king_attacked(&scratch, piece.color) {
                legal.push(mv);
            }

            scratch.set(start, Some(piece));
            scratch.set(mv.end, captured);
        }
        legal
    }

    /// Execute `mv` and flip the turn. Does not record check or
    /// game-over; callers query the status methods afterwards.
    pub fn make_move(&mut self, mv: ChessMove) -> Result<(), MoveError> {
        if !mv.start.on_board() {
            return Err(MoveError::NoPieceAtSource);
        }
        let piece = self
            .board
            .piece_at(mv.start)
            .ok_or(MoveError::NoPieceAtSource)?;
        if piece.color != self.turn {
            return Err(MoveError::WrongTurn);
        }
        if !self.valid_moves(mv.start).contains(&mv) {
            return Err(MoveError::IllegalMove);
        }

        let placed = match mv.promotion {
            Some(kind) => Piece::new(piece.color, kind),
            None => piece,
        };
        self.board.set(mv.start, None);
        self.board.set(mv.end, Some(placed));
        self.turn = self.turn.opposite();
        Ok(())
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        king_attacked(&self.board, color)
    }

    pub fn is_in_checkmate(&self, color: Color) -> bool {
        self.is_in_check(color) && self.no_legal_moves(color)
    }

    pub fn is_in_stalemate(&self, color: Color) -> bool {
        !self.is_in_check(color) && self.no_legal_moves(color)
    }

    fn no_legal_moves(&self, color: Color) -> bool {
        Board::positions().all(|pos| match self.board.piece_at(pos) {
            Some(piece) if piece.color == color => self.valid_moves(pos).is_empty(),
            _ => true,
        })
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}

/// Scan all 64 squares for an opposing piece whose pseudo-legal moves
/// reach `color`'s king square.
fn king_attacked(board: &Board, color: Color) -> bool {
    let king = match board.find_king(color) {
        Some(pos) => pos,
        None => return false,
    };
    Board::positions().any(|pos| match board.piece_at(pos) {
        Some(piece) if piece.color != color => piece
            .pseudo_moves(board, pos)
            .iter()
            .any(|mv| mv.end == king),
        _ => false,
    })
}
