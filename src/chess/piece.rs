use serde::{Deserialize, Serialize};

use crate::chess::board::Board;
use crate::chess::position::{ChessMove, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    pub fn new(color: Color, kind: PieceKind) -> Self {
        Piece { color, kind }
    }

    /// All moves following this piece's movement pattern from `from`,
    /// ignoring whether they expose the mover's king. Reads the board,
    /// never mutates it.
    pub fn pseudo_moves(self, board: &Board, from: Position) -> Vec<ChessMove> {
        match self.kind {
            PieceKind::Queen => slide(board, from, self.color, &ALL_DIRS),
            PieceKind::Rook => slide(board, from, self.color, &ROOK_DIRS),
            PieceKind::Bishop => slide(board, from, self.color, &BISHOP_DIRS),
            PieceKind::King => step(board, from, self.color, &ALL_DIRS),
            PieceKind::Knight => step(board, from, self.color, &KNIGHT_JUMPS),
            PieceKind::Pawn => pawn_moves(board, from, self.color),
        }
    }
}

const ROOK_DIRS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ALL_DIRS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];
const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
];

pub const PROMOTION_KINDS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

/// Walk each direction outward one square at a time. The ray stops at
/// the first occupied square, which is included only as a capture.
fn slide(board: &Board, from: Position, mover: Color, dirs: &[(i8, i8)]) -> Vec<ChessMove> {
    let mut moves = Vec::new();
    for &(d_row, d_col) in dirs {
        let mut target = from.offset(d_row, d_col);
        while target.on_board() {
            match board.piece_at(target) {
                None => moves.push(ChessMove::new(from, target)),
                Some(occupant) => {
                    if occupant.color != mover {
                        moves.push(ChessMove::new(from, target));
                    }
                    break;
                }
            }
            target = target.offset(d_row, d_col);
        }
    }
    moves
}

/// Evaluate each offset exactly once; off-board targets are discarded.
fn step(board: &Board, from: Position, mover: Color, offsets: &[(i8, i8)]) -> Vec<ChessMove> {
    let mut moves = Vec::new();
    for &(d_row, d_col) in offsets {
        let target = from.offset(d_row, d_col);
        if !target.on_board() {
            continue;
        }
        match board.piece_at(target) {
            None => moves.push(ChessMove::new(from, target)),
            Some(occupant) => {
                if occupant.color != mover {
                    moves.push(ChessMove::new(from, target));
                }
            }
        }
    }
    moves
}

fn pawn_moves(board: &Board, from: Position, mover: Color) -> Vec<ChessMove> {
    let (forward, start_rank, far_rank) = match mover {
        Color::White => (1, 2, 8),
        Color::Black => (-1, 7, 1),
    };
    let mut moves = Vec::new();

    // Diagonal captures.
    for d_col in [-1, 1] {
        let target = from.offset(forward, d_col);
        if !target.on_board() {
            continue;
        }
        if let Some(occupant) = board.piece_at(target) {
            if occupant.color != mover {
                push_pawn_move(&mut moves, from, target, far_rank);
            }
        }
    }

    // Single push, then the double push from the starting rank. Both
    // squares of the double push must be empty.
    let single = from.offset(forward, 0);
    if single.on_board() && board.piece_at(single).is_none() {
        push_pawn_move(&mut moves, from, single, far_rank);
        if from.row == start_rank {
            let double = from.offset(forward * 2, 0);
            if double.on_board() && board.piece_at(double).is_none() {
                moves.push(ChessMove::new(from, double));
            }
        }
    }

    moves
}

/// A pawn arrival on the far rank is emitted once per promotion choice
/// instead of once.
fn push_pawn_move(moves: &mut Vec<ChessMove>, from: Position, to: Position, far_rank: i8) {
    if to.row == far_rank {
        for kind in PROMOTION_KINDS {
            moves.push(ChessMove::promoting(from, to, kind));
        }
    } else {
        moves.push(ChessMove::new(from, to));
    }
}
