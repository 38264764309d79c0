use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Error;

/// Supplies the current access/refresh pair and persists replacements.
///
/// Reads are infallible: missing or unreadable state falls back to the
/// defaults the store was constructed with. `update_tokens` makes both values
/// visible together to subsequent reads; a later read never observes an old
/// access token next to a new refresh token.
pub trait TokenStore: Send + Sync {
    fn access_token(&self) -> String;
    fn refresh_token(&self) -> String;
    fn update_tokens(&self, access: &str, refresh: &str) -> Result<(), Error>;
}

#[derive(Serialize, Deserialize)]
struct PersistedTokens {
    access_token: String,
    refresh_token: String,
}

/// Token store backed by a single JSON file. The pair is committed with one
/// `fs::write`, so it lands as a unit.
pub struct FileTokenStore {
    path: PathBuf,
    default_access: String,
    default_refresh: String,
}

impl FileTokenStore {
    pub fn new(
        path: impl Into<PathBuf>,
        default_access: impl Into<String>,
        default_refresh: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            default_access: default_access.into(),
            default_refresh: default_refresh.into(),
        }
    }

    fn load(&self) -> Option<PersistedTokens> {
        let contents = fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&contents).ok()
    }
}

impl TokenStore for FileTokenStore {
    fn access_token(&self) -> String {
        self.load()
            .map(|tokens| tokens.access_token)
            .unwrap_or_else(|| self.default_access.clone())
    }

    fn refresh_token(&self) -> String {
        self.load()
            .map(|tokens| tokens.refresh_token)
            .unwrap_or_else(|| self.default_refresh.clone())
    }

    fn update_tokens(&self, access: &str, refresh: &str) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tokens = PersistedTokens {
            access_token: access.to_string(),
            refresh_token: refresh.to_string(),
        };
        let contents = serde_json::to_string_pretty(&tokens)
            .map_err(|err| Error::Storage(io::Error::other(err)))?;
        fs::write(&self.path, contents)?;
        debug!(path = %self.path.display(), "stored token pair");
        Ok(())
    }
}

/// In-memory store for tests and embedders that manage durability themselves.
pub struct MemoryTokenStore {
    default_access: String,
    default_refresh: String,
    stored: Mutex<Option<(String, String)>>,
}

impl MemoryTokenStore {
    pub fn new(default_access: impl Into<String>, default_refresh: impl Into<String>) -> Self {
        Self {
            default_access: default_access.into(),
            default_refresh: default_refresh.into(),
            stored: Mutex::new(None),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn access_token(&self) -> String {
        self.stored
            .lock()
            .ok()
            .and_then(|stored| stored.as_ref().map(|(access, _)| access.clone()))
            .unwrap_or_else(|| self.default_access.clone())
    }

    fn refresh_token(&self) -> String {
        self.stored
            .lock()
            .ok()
            .and_then(|stored| stored.as_ref().map(|(_, refresh)| refresh.clone()))
            .unwrap_or_else(|| self.default_refresh.clone())
    }

    fn update_tokens(&self, access: &str, refresh: &str) -> Result<(), Error> {
        let mut stored = self
            .stored
            .lock()
            .map_err(|_| Error::Storage(io::Error::other("store poisoned")))?;
        *stored = Some((access.to_string(), refresh.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_state_falls_back_to_defaults() {
        let dir = tempdir().expect("tempdir");
        let store = FileTokenStore::new(dir.path().join("tokens.json"), "t0", "r0");
        assert_eq!(store.access_token(), "t0");
        assert_eq!(store.refresh_token(), "r0");
    }

    #[test]
    fn update_then_read_returns_exactly_the_pair() {
        let dir = tempdir().expect("tempdir");
        let store = FileTokenStore::new(dir.path().join("tokens.json"), "t0", "r0");
        store.update_tokens("a1", "r1").expect("update");
        assert_eq!(store.access_token(), "a1");
        assert_eq!(store.refresh_token(), "r1");
    }

    #[test]
    fn last_write_wins_across_updates() {
        let dir = tempdir().expect("tempdir");
        let store = FileTokenStore::new(dir.path().join("tokens.json"), "t0", "r0");
        store.update_tokens("a1", "r1").expect("update");
        store.update_tokens("a2", "r2").expect("update");
        store.update_tokens("a3", "r3").expect("update");
        assert_eq!(store.access_token(), "a3");
        assert_eq!(store.refresh_token(), "r3");
    }

    #[test]
    fn state_survives_a_new_store_instance() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("tokens.json");
        FileTokenStore::new(&path, "t0", "r0")
            .update_tokens("a1", "r1")
            .expect("update");
        let reopened = FileTokenStore::new(&path, "t0", "r0");
        assert_eq!(reopened.access_token(), "a1");
        assert_eq!(reopened.refresh_token(), "r1");
    }

    #[test]
    fn unreadable_state_falls_back_to_defaults() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("tokens.json");
        std::fs::write(&path, "not json").expect("write");
        let store = FileTokenStore::new(&path, "t0", "r0");
        assert_eq!(store.access_token(), "t0");
        assert_eq!(store.refresh_token(), "r0");
    }

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryTokenStore::new("t0", "r0");
        assert_eq!(store.access_token(), "t0");
        store.update_tokens("a1", "r1").expect("update");
        assert_eq!(store.access_token(), "a1");
        assert_eq!(store.refresh_token(), "r1");
    }
}
