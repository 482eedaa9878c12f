use serde::{Deserialize, Serialize};

use crate::chess::{Color, Game};

pub type GameId = u32;

/// The stored record for one game: the embedded rules-engine state plus
/// the seats and the outcome flags. Whether play has stopped lives here,
/// not on `Game`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    pub game_id: GameId,
    pub white_username: Option<String>,
    pub black_username: Option<String>,
    pub game_name: String,
    pub game: Game,
    pub game_over: bool,
    pub white_won: bool,
}

impl GameRecord {
    pub fn new(game_id: GameId, game_name: &str) -> Self {
        GameRecord {
            game_id,
            white_username: None,
            black_username: None,
            game_name: game_name.to_string(),
            game: Game::new(),
            game_over: false,
            white_won: false,
        }
    }

    /// The seat `username` holds, if any. Observers hold none.
    pub fn seat_of(&self, username: &str) -> Option<Color> {
        if self.white_username.as_deref() == Some(username) {
            Some(Color::White)
        } else if self.black_username.as_deref() == Some(username) {
            Some(Color::Black)
        } else {
            None
        }
    }
}
