use serde::{Deserialize, Serialize};

use crate::chess::piece::{Color, Piece, PieceKind};
use crate::chess::position::Position;

/// 8×8 occupancy grid. Squares are addressed exclusively through
/// `Position`, whose coordinates are 1..=8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Board {
    pub fn empty() -> Self {
        Board {
            squares: [[None; 8]; 8],
        }
    }

    /// The standard starting placement: White on ranks 1 and 2, Black
    /// on ranks 7 and 8.
    pub fn standard() -> Self {
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        let mut board = Board::empty();
        for col in 1..=8 {
            let kind = BACK_RANK[(col - 1) as usize];
            board.set(Position::new(1, col), Some(Piece::new(Color::White, kind)));
            board.set(
                Position::new(2, col),
                Some(Piece::new(Color::White, PieceKind::Pawn)),
            );
            board.set(
                Position::new(7, col),
                Some(Piece::new(Color::Black, PieceKind::Pawn)),
            );
            board.set(Position::new(8, col), Some(Piece::new(Color::Black, kind)));
        }
        board
    }

    pub fn piece_at(&self, pos: Position) -> Option<Piece> {
        debug_assert!(pos.on_board(), "square off the board: {}", pos);
        self.squares[(pos.row - 1) as usize][(pos.col - 1) as usize]
    }

    pub fn set(&mut self, pos: Position, piece: Option<Piece>) {
        debug_assert!(pos.on_board(), "square off the board: {}", pos);
        self.squares[(pos.row - 1) as usize][(pos.col - 1) as usize] = piece;
    }

    /// All 64 squares, row by row.
    pub fn positions() -> impl Iterator<Item = Position> {
        (1..=8).flat_map(|row| (1..=8).map(move |col| Position::new(row, col)))
    }

    pub fn find_king(&self, color: Color) -> Option<Position> {
        Board::positions()
            .find(|&pos| self.piece_at(pos) == Some(Piece::new(color, PieceKind::King)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_placement() {
        let board = Board::standard();
        assert_eq!(
            board.piece_at(Position::new(1, 5)),
            Some(Piece::new(Color::White, PieceKind::King))
        );
        assert_eq!(
            board.piece_at(Position::new(8, 4)),
            Some(Piece::new(Color::Black, PieceKind::Queen))
        );
        assert_eq!(
            board.piece_at(Position::new(2, 1)),
            Some(Piece::new(Color::White, PieceKind::Pawn))
        );
        assert_eq!(board.piece_at(Position::new(4, 4)), None);
        assert_eq!(Board::positions().count(), 64);
    }

    #[test]
    fn find_king_locates_each_side() {
        let board = Board::standard();
        assert_eq!(board.find_king(Color::White), Some(Position::new(1, 5)));
        assert_eq!(board.find_king(Color::Black), Some(Position::new(8, 5)));
        assert_eq!(Board::empty().find_king(Color::White), None);
    }
}
