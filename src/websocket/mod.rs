pub mod handler;

pub use handler::{ws_index, ChessSocket, OutboundText, WsSink};
