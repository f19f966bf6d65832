//! Session token storage and retrieval.
//!
//! Stores the API bearer token in `<base>/session.json` with restricted
//! permissions (0600). Tokens are never logged or displayed in full.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::paths;

/// Session token filename.
const SESSION_FILE: &str = "session.json";

/// Persisted session state.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct SessionStore {
    /// Bearer token issued by the login endpoint, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl SessionStore {
    /// Returns the path to the session file.
    pub fn store_path() -> PathBuf {
        paths::leadctl_home().join(SESSION_FILE)
    }

    /// Loads the session from the default path.
    /// Returns an empty session if the file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::store_path())
    }

    /// Loads the session from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read session from {}", path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse session from {}", path.display()))
    }

    /// Saves the session to the default path with restricted permissions (0600).
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::store_path())
    }

    /// Saves the session to a specific path with restricted permissions (0600).
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize session")?;

        // Write with restricted permissions
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(path)
                .with_context(|| format!("Failed to open {} for writing", path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(path, contents)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }

        Ok(())
    }

    /// Removes the session file at the default path, if present.
    pub fn clear() -> Result<()> {
        Self::clear_at(&Self::store_path())
    }

    /// Removes the session file at a specific path, if present.
    pub fn clear_at(path: &Path) -> Result<()> {
        if path.exists() {
            fs::remove_file(path)
                .with_context(|| format!("Failed to remove session file {}", path.display()))?;
        }
        Ok(())
    }
}

/// Returns a masked version of a token for display (first 12 chars + ...).
pub fn mask_token(token: &str) -> String {
    if token.len() <= 16 {
        return "***".to_string();
    }
    format!("{}...", &token[..12])
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    /// Loading a missing file yields an empty session.
    #[test]
    fn test_load_missing_file_returns_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = SessionStore::load_from(&path).unwrap();
        assert!(store.token.is_none());
    }

    /// Save then load returns the same token.
    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = SessionStore {
            token: Some("12|abcdef".to_string()),
        };
        store.save_to(&path).unwrap();

        let loaded = SessionStore::load_from(&path).unwrap();
        assert_eq!(loaded.token.as_deref(), Some("12|abcdef"));
    }

    /// Session file is written with owner-only permissions.
    #[cfg(unix)]
    #[test]
    fn test_save_restricts_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = SessionStore {
            token: Some("12|abcdef".to_string()),
        };
        store.save_to(&path).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    /// clear_at removes the file and tolerates a missing one.
    #[test]
    fn test_clear_removes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = SessionStore {
            token: Some("12|abcdef".to_string()),
        };
        store.save_to(&path).unwrap();
        assert!(path.exists());

        SessionStore::clear_at(&path).unwrap();
        assert!(!path.exists());

        // Second clear is a no-op, not an error
        SessionStore::clear_at(&path).unwrap();
    }

    /// Serialization skips the token field when absent.
    #[test]
    fn test_empty_session_serializes_without_token() {
        let json = serde_json::to_string(&SessionStore::default()).unwrap();
        assert_eq!(json, "{}");

        let loaded: SessionStore = serde_json::from_str("{}").unwrap();
        assert!(loaded.token.is_none());
    }

    /// Token masking.
    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("12|aVeryLongApiTokenValue"), "12|aVeryLong...");
        assert_eq!(mask_token("short"), "***");
    }
}
