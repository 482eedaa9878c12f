use std::sync::Arc;

use crate::session::{ConnectionRegistry, SessionCoordinator};
use crate::store::{AuthStore, GameStore};

/// Application state shared between connections. The stores are explicit
/// objects created at process start and handed to the coordinator; the
/// auth and game stores stay reachable here for the surrounding account
/// and listing services.
pub struct AppState {
    pub auth: Arc<AuthStore>,
    pub games: Arc<GameStore>,
    pub registry: Arc<ConnectionRegistry>,
    pub sessions: SessionCoordinator,
}

impl AppState {
    pub fn new() -> Self {
        let auth = Arc::new(AuthStore::new());
        let games = Arc::new(GameStore::new());
        let registry = Arc::new(ConnectionRegistry::new());
        let sessions = SessionCoordinator::new(auth.clone(), games.clone(), registry.clone());
        AppState {
            auth,
            games,
            registry,
            sessions,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        AppState::new()
    }
}
