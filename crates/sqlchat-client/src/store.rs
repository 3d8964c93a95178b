//! Client-side key-value storage.
//!
//! Nothing read from here is trusted beyond what the token itself proves; the
//! gateway re-verifies it on every call.

use dashmap::DashMap;

/// Key holding the bearer token.
pub const AUTH_TOKEN_KEY: &str = "auth_token";

/// Key holding the signed-in user's summary as JSON.
pub const USER_DATA_KEY: &str = "user_data";

/// Key holding a connection's reshaped schema as JSON.
pub fn schema_key(connection_id: &str) -> String {
    format!("schema_{connection_id}")
}

pub trait LocalStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
    fn remove(&self, key: &str);
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    fn set(&self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        self.entries.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert!(store.get(AUTH_TOKEN_KEY).is_none());

        store.set(AUTH_TOKEN_KEY, "token".into());
        store.set(&schema_key("c1"), "[]".into());
        assert_eq!(store.get(AUTH_TOKEN_KEY).as_deref(), Some("token"));
        assert_eq!(store.get("schema_c1").as_deref(), Some("[]"));

        store.remove(AUTH_TOKEN_KEY);
        assert!(store.get(AUTH_TOKEN_KEY).is_none());
    }
}
