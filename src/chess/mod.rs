pub mod board;
pub mod game;
pub mod piece;
pub mod position;

pub use board::Board;
pub use game::{Game, MoveError};
pub use piece::{Color, Piece, PieceKind};
pub use position::{ChessMove, Position};
