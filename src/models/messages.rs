use serde::{Deserialize, Serialize};

use crate::chess::ChessMove;
use crate::models::game_record::{GameId, GameRecord};

/// Command sent from client to server over the WebSocket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientCommand {
    #[serde(rename = "type")]
    pub command: CommandType,
    pub auth_token: String,
    pub game_id: GameId,
    #[serde(rename = "move", default, skip_serializing_if = "Option::is_none")]
    pub chess_move: Option<ChessMove>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandType {
    Connect,
    MakeMove,
    Leave,
    Resign,
}

/// Message sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    LoadGame { game: GameRecord },
    Notification { message: String },
    Error { message: String },
}
