//! In-memory credential store for tests.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{Result, StorageError};
use crate::port::outbound::storage::{CredentialStore, PersistedSession};

/// Credential store held in memory, with injectable failures to exercise
/// the log-and-swallow persistence policy.
#[derive(Default)]
pub struct MemoryCredentialStore {
    record: Mutex<Option<PersistedSession>>,
    fail_loads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_session(session: PersistedSession) -> Self {
        let store = Self::default();
        *store.record.lock() = Some(session);
        store
    }

    /// Make every subsequent `load` fail.
    pub fn fail_loads(&self) {
        self.fail_loads.store(true, Ordering::SeqCst);
    }

    /// Make every subsequent `save`/`clear` fail.
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn persisted(&self) -> Option<PersistedSession> {
        self.record.lock().clone()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn load(&self) -> Result<Option<PersistedSession>> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(StorageError::Read(std::io::Error::other("injected load failure")).into());
        }
        Ok(self.record.lock().clone())
    }

    async fn save(&self, session: &PersistedSession) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(
                StorageError::Write(std::io::Error::other("injected write failure")).into(),
            );
        }
        *self.record.lock() = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(
                StorageError::Write(std::io::Error::other("injected write failure")).into(),
            );
        }
        *self.record.lock() = None;
        Ok(())
    }
}
