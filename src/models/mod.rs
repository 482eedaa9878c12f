pub mod app_state;
pub mod game_record;
pub mod messages;

pub use app_state::AppState;
pub use game_record::{GameId, GameRecord};
pub use messages::{ClientCommand, CommandType, ServerMessage};
