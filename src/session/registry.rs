use log::{debug, warn};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::models::game_record::GameId;
use crate::models::messages::ServerMessage;

/// Outbound half of one socket. The production impl wraps the WebSocket
/// actor's mailbox; tests substitute a recording sink. Sends are
/// fire-and-forget: a send to a closed socket is dropped, never retried.
pub trait ClientSink: Send + Sync {
    fn send(&self, text: String);
}

/// One live connection: who it is, which game it is bound to, and how
/// to reach it.
#[derive(Clone)]
pub struct Connection {
    pub token: String,
    pub username: String,
    pub game_id: GameId,
    pub sink: Arc<dyn ClientSink>,
}

/// Live mapping from auth token to connection, mutated concurrently by
/// independent socket handlers. There is no secondary index by game id;
/// broadcast scans the registry.
pub struct ConnectionRegistry {
    connections: Mutex<HashMap<String, Connection>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        ConnectionRegistry {
            connections: Mutex::new(HashMap::new()),
        }
    }

    /// Register or rebind a connection. A token reconnecting to a new
    /// game simply replaces its old entry.
    pub fn insert(&self, connection: Connection) {
        self.connections
            .lock()
            .unwrap()
            .insert(connection.token.clone(), connection);
    }

    pub fn remove(&self, token: &str) -> Option<Connection> {
        self.connections.lock().unwrap().remove(token)
    }

    pub fn len(&self) -> usize {
        self.connections.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.lock().unwrap().is_empty()
    }

    /// Whether `token` is currently bound to `game_id`.
    pub fn is_bound(&self, token: &str, game_id: GameId) -> bool {
        self.connections
            .lock()
            .unwrap()
            .get(token)
            .map(|connection| connection.game_id == game_id)
            .unwrap_or(false)
    }

    /// Send `message` to every connection bound to `game_id`, optionally
    /// excluding one token. The message is serialized once; the scan
    /// happens on a snapshot so sinks are invoked outside the lock.
    pub fn broadcast(&self, game_id: GameId, exclude: Option<&str>, message: &ServerMessage) {
        let recipients: Vec<Connection> = {
            let connections = self.connections.lock().unwrap();
            connections
                .values()
                .filter(|connection| connection.game_id == game_id)
                .filter(|connection| exclude != Some(connection.token.as_str()))
                .cloned()
                .collect()
        };

        let text = match serde_json::to_string(message) {
            Ok(text) => text,
            Err(err) => {
                warn!("failed to serialize broadcast message: {}", err);
                return;
            }
        };

        debug!(
            "broadcasting to {} connection(s) on game {}",
            recipients.len(),
            game_id
        );
        for connection in recipients {
            connection.sink.send(text.clone());
        }
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        ConnectionRegistry::new()
    }
}
