use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// Token-to-username store. Tokens are issued by the account service;
/// the coordinator only resolves them.
pub struct AuthStore {
    tokens: Mutex<HashMap<String, String>>,
}

impl AuthStore {
    pub fn new() -> Self {
        AuthStore {
            tokens: Mutex::new(HashMap::new()),
        }
    }

    /// Mint a fresh token for `username`.
    pub fn issue(&self, username: &str) -> String {
        let token = Uuid::new_v4().to_string();
        self.tokens
            .lock()
            .unwrap()
            .insert(token.clone(), username.to_string());
        token
    }

    pub fn resolve(&self, token: &str) -> Option<String> {
        self.tokens.lock().unwrap().get(token).cloned()
    }

    pub fn revoke(&self, token: &str) -> bool {
        self.tokens.lock().unwrap().remove(token).is_some()
    }

    pub fn clear(&self) {
        self.tokens.lock().unwrap().clear();
    }
}

impl Default for AuthStore {
    fn default() -> Self {
        AuthStore::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_and_resolve() {
        let store = AuthStore::new();
        let token = store.issue("alice");
        assert_eq!(store.resolve(&token), Some("alice".to_string()));
        assert_eq!(store.resolve("no-such-token"), None);
    }

    #[test]
    fn tokens_are_unique_per_issue() {
        let store = AuthStore::new();
        let first = store.issue("alice");
        let second = store.issue("alice");
        assert_ne!(first, second);
        assert_eq!(store.resolve(&second), Some("alice".to_string()));
    }

    #[test]
    fn revoke_and_clear() {
        let store = AuthStore::new();
        let token = store.issue("bob");
        assert!(store.revoke(&token));
        assert!(!store.revoke(&token));

        let token = store.issue("bob");
        store.clear();
        assert_eq!(store.resolve(&token), None);
    }
}
