// console-client/src/token.rs
// 令牌存储 - 适配器 API token 的本地持久化

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::{ClientError, ClientResult};

/// Fixed file name under the data directory
const TOKEN_FILE: &str = "token.json";

/// Persisted token payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredToken {
    pub token: String,
    pub saved_at: DateTime<Utc>,
}

/// Outcome of probing the adapter with a candidate token
///
/// `Unreachable` is a network-level verdict: nothing answered, so the token
/// was neither accepted nor rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenProbe {
    Valid,
    Invalid { status: u16 },
    Unreachable { reason: String },
}

/// File-backed store for the adapter API token
///
/// Holds one opaque string under a fixed file, with an in-memory copy so
/// request paths never touch the filesystem.
#[derive(Debug)]
pub struct TokenStore {
    path: PathBuf,
    cached: RwLock<Option<String>>,
}

impl TokenStore {
    /// Open a store rooted at `data_dir`, loading any persisted token
    pub fn open(data_dir: impl Into<PathBuf>) -> Self {
        let path = data_dir.into().join(TOKEN_FILE);
        let cached = Self::read_file(&path);
        if cached.is_some() {
            tracing::debug!(path = %path.display(), "loaded persisted token");
        }
        Self {
            path,
            cached: RwLock::new(cached),
        }
    }

    fn read_file(path: &Path) -> Option<String> {
        let json = fs::read_to_string(path).ok()?;
        let stored: StoredToken = serde_json::from_str(&json).ok()?;
        Some(stored.token)
    }

    fn ensure_dir(&self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Persist a token, trimming surrounding whitespace first
    ///
    /// An all-whitespace token is rejected and the stored value is left
    /// untouched.
    pub fn set(&self, token: &str) -> ClientResult<()> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ClientError::EmptyToken);
        }
        self.ensure_dir()?;
        let stored = StoredToken {
            token: token.to_string(),
            saved_at: Utc::now(),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&stored)?)?;
        *self.cached.write().expect("token cache poisoned") = Some(token.to_string());
        tracing::debug!(path = %self.path.display(), "token saved");
        Ok(())
    }

    /// Current token, if one is set
    pub fn get(&self) -> Option<String> {
        self.cached.read().expect("token cache poisoned").clone()
    }

    /// Whether a token is currently set
    pub fn is_set(&self) -> bool {
        self.cached
            .read()
            .expect("token cache poisoned")
            .is_some()
    }

    /// Remove the token from memory and disk
    ///
    /// Clearing an unset token is a no-op.
    pub fn clear(&self) -> ClientResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        *self.cached.write().expect("token cache poisoned") = None;
        tracing::debug!("token cleared");
        Ok(())
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_set_trims_and_persists() {
        let dir = TempDir::new().unwrap();
        let store = TokenStore::open(dir.path());

        store.set("  adapter-token-123  ").unwrap();
        assert_eq!(store.get().as_deref(), Some("adapter-token-123"));

        let raw = fs::read_to_string(store.path()).unwrap();
        let stored: StoredToken = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored.token, "adapter-token-123");
    }

    #[test]
    fn test_set_rejects_blank_token() {
        let dir = TempDir::new().unwrap();
        let store = TokenStore::open(dir.path());
        store.set("keep-me").unwrap();

        let result = store.set("   ");
        assert!(matches!(result, Err(ClientError::EmptyToken)));
        // the previous value survives a rejected set
        assert_eq!(store.get().as_deref(), Some("keep-me"));
    }

    #[test]
    fn test_open_loads_persisted_token() {
        let dir = TempDir::new().unwrap();
        {
            let store = TokenStore::open(dir.path());
            store.set("persisted").unwrap();
        }
        let reopened = TokenStore::open(dir.path());
        assert_eq!(reopened.get().as_deref(), Some("persisted"));
        assert!(reopened.is_set());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = TokenStore::open(dir.path());
        store.set("gone-soon").unwrap();

        store.clear().unwrap();
        assert!(store.get().is_none());
        assert!(!store.path().exists());

        // clearing again must not fail
        store.clear().unwrap();
        assert!(!store.is_set());
    }

    #[test]
    fn test_corrupt_file_reads_as_unset() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("token.json");
        fs::write(&path, "not json at all").unwrap();

        let store = TokenStore::open(dir.path());
        assert!(store.get().is_none());
    }
}
