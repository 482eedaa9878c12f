use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::chess::Color;
use crate::models::game_record::{GameId, GameRecord};

/// In-memory game store. Each record sits behind its own lock so that
/// every mutation of one game (validate, mutate, persist) happens inside
/// a single exclusive section per game id; two connections moving against
/// the same game can never interleave on stale state.
pub struct GameStore {
    games: Mutex<HashMap<GameId, Arc<Mutex<GameRecord>>>>,
    next_id: Mutex<GameId>,
}

impl GameStore {
    pub fn new() -> Self {
        GameStore {
            games: Mutex::new(HashMap::new()),
            next_id: Mutex::new(1),
        }
    }

    /// Create a fresh game and return its id. Ids are sequential and
    /// advance exactly once per create.
    pub fn create(&self, game_name: &str) -> GameId {
        let mut next_id = self.next_id.lock().unwrap();
        let game_id = *next_id;
        *next_id += 1;
        self.games.lock().unwrap().insert(
            game_id,
            Arc::new(Mutex::new(GameRecord::new(game_id, game_name))),
        );
        game_id
    }

    /// Snapshot of the record, if the game exists.
    pub fn get(&self, game_id: GameId) -> Option<GameRecord> {
        let record = self.record(game_id)?;
        let record = record.lock().unwrap();
        Some(record.clone())
    }

    pub fn save(&self, game_id: GameId, updated: GameRecord) -> bool {
        match self.record(game_id) {
            Some(record) => {
                *record.lock().unwrap() = updated;
                true
            }
            None => false,
        }
    }

    /// Run `f` with exclusive access to the record. Returns `None` when
    /// the game does not exist. This is the serialization point for all
    /// per-game mutation.
    pub fn with_record<T>(&self, game_id: GameId, f: impl FnOnce(&mut GameRecord) -> T) -> Option<T> {
        let record = self.record(game_id)?;
        let mut record = record.lock().unwrap();
        Some(f(&mut record))
    }

    /// Vacate one seat; the record itself stays.
    pub fn clear_seat(&self, game_id: GameId, color: Color) -> bool {
        self.with_record(game_id, |record| match color {
            Color::White => record.white_username = None,
            Color::Black => record.black_username = None,
        })
        .is_some()
    }

    pub fn clear(&self) {
        self.games.lock().unwrap().clear();
        *self.next_id.lock().unwrap() = 1;
    }

    fn record(&self, game_id: GameId) -> Option<Arc<Mutex<GameRecord>>> {
        self.games.lock().unwrap().get(&game_id).cloned()
    }
}

impl Default for GameStore {
    fn default() -> Self {
        GameStore::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sequential() {
        let store = GameStore::new();
        assert_eq!(store.create("first"), 1);
        assert_eq!(store.create("second"), 2);
        assert_eq!(store.create("third"), 3);
    }

    #[test]
    fn get_returns_a_snapshot() {
        let store = GameStore::new();
        let id = store.create("snapshot test");
        let mut snapshot = store.get(id).unwrap();
        snapshot.white_username = Some("alice".to_string());

        // Mutating the snapshot does not touch the stored record.
        assert_eq!(store.get(id).unwrap().white_username, None);
        assert!(store.get(99).is_none());
    }

    #[test]
    fn save_replaces_the_stored_record() {
        let store = GameStore::new();
        let id = store.create("save test");

        let mut updated = store.get(id).unwrap();
        updated.white_username = Some("alice".to_string());
        updated.game_over = true;
        updated.white_won = true;
        assert!(store.save(id, updated));

        let record = store.get(id).unwrap();
        assert_eq!(record.white_username, Some("alice".to_string()));
        assert!(record.game_over);
        assert!(record.white_won);

        // Saving against an unknown id is refused.
        let orphan = GameRecord::new(99, "orphan");
        assert!(!store.save(99, orphan));
    }

    #[test]
    fn with_record_persists_mutation() {
        let store = GameStore::new();
        let id = store.create("mutation test");
        store.with_record(id, |record| {
            record.black_username = Some("bob".to_string());
        });
        assert_eq!(
            store.get(id).unwrap().black_username,
            Some("bob".to_string())
        );
        assert!(store.with_record(99, |_| ()).is_none());
    }

    #[test]
    fn clear_seat_vacates_only_that_color() {
        let store = GameStore::new();
        let id = store.create("seats");
        store.with_record(id, |record| {
            record.white_username = Some("alice".to_string());
            record.black_username = Some("bob".to_string());
        });

        assert!(store.clear_seat(id, Color::White));
        let record = store.get(id).unwrap();
        assert_eq!(record.white_username, None);
        assert_eq!(record.black_username, Some("bob".to_string()));
        assert!(!store.clear_seat(99, Color::White));
    }

    #[test]
    fn clear_resets_the_id_sequence() {
        let store = GameStore::new();
        store.create("a");
        store.create("b");
        store.clear();
        assert_eq!(store.create("fresh"), 1);
    }
}
