//! Credential persistence port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{AuthToken, User};
use crate::error::Result;

/// The durable representation of an authenticated session.
///
/// Token and user are persisted and cleared together; a record with one
/// but not the other never exists on disk by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSession {
    #[serde(rename = "session-token")]
    pub token: AuthToken,
    #[serde(rename = "session-user")]
    pub user: User,
}

/// Durable key-value storage for session credentials.
///
/// The session store is the only component that touches this; everything
/// else receives the token as an explicit parameter.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Load the persisted session, if any. Corrupt or partial data must
    /// be cleared and reported as `None`, not an error.
    async fn load(&self) -> Result<Option<PersistedSession>>;

    /// Persist the session, replacing any previous record.
    async fn save(&self, session: &PersistedSession) -> Result<()>;

    /// Remove any persisted session. Idempotent.
    async fn clear(&self) -> Result<()>;
}
