//! JSON-file credential store.
//!
//! Token and user live in one document, so the two logical keys are
//! written and cleared atomically by construction.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tracing::warn;

use crate::error::{Result, StorageError};
use crate::port::outbound::storage::{CredentialStore, PersistedSession};

/// Credential store backed by a single JSON file.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The default store at `~/.decanter/session.json`.
    #[must_use]
    pub fn default_location() -> Self {
        Self::new(crate::config::paths::session_file())
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn load(&self) -> Result<Option<PersistedSession>> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StorageError::Read(err).into()),
        };

        match serde_json::from_slice::<PersistedSession>(&bytes) {
            Ok(session) => Ok(Some(session)),
            Err(err) => {
                // A corrupt record is unrecoverable; drop it so the next
                // start is a clean anonymous session.
                warn!(path = %self.path.display(), error = %err, "clearing corrupt session file");
                self.clear().await?;
                Ok(None)
            }
        }
    }

    async fn save(&self, session: &PersistedSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(StorageError::Write)?;
        }

        let bytes = serde_json::to_vec_pretty(session)?;
        fs::write(&self.path, bytes)
            .await
            .map_err(|err| StorageError::Write(err).into())
    }

    async fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StorageError::Write(err).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AuthToken, User};

    fn store_in(dir: &tempfile::TempDir) -> FileCredentialStore {
        FileCredentialStore::new(dir.path().join("session.json"))
    }

    fn sample() -> PersistedSession {
        PersistedSession {
            token: AuthToken::new("T1"),
            user: User::fallback("a@b.com"),
        }
    }

    #[tokio::test]
    async fn load_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(store_in(&dir).load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save(&sample()).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(sample()));
    }

    #[tokio::test]
    async fn corrupt_file_is_cleared_and_reported_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, b"{not json").unwrap();

        let store = FileCredentialStore::new(&path);
        assert_eq!(store.load().await.unwrap(), None);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn partial_record_is_treated_as_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        // Token present, user absent: violates the presence invariant.
        std::fs::write(&path, br#"{"session-token": "T1"}"#).unwrap();

        let store = FileCredentialStore::new(&path);
        assert_eq!(store.load().await.unwrap(), None);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.clear().await.unwrap();
        store.save(&sample()).await.unwrap();
        store.clear().await.unwrap();
        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);
    }
}
