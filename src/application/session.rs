//! The session store: single source of truth for authentication state.
//!
//! Owns the current [`Session`], persists credentials through the
//! [`CredentialStore`] port, and publishes token changes on a watch
//! channel so collection synchronizers can reload. Lifecycle:
//!
//! ```text
//! Uninitialized -> Loading -> { Authenticated, Anonymous }
//!                              Authenticated <-> Anonymous (login/logout)
//! ```
//!
//! Persistence failures are logged and swallowed: the session stays valid
//! in memory for the current process, it just will not survive a restart.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::domain::{AuthToken, Session, SessionStatus, SubscriptionTier, TokenClaims, User};
use crate::error::{AuthError, Error, Result};
use crate::port::outbound::gateway::CatalogGateway;
use crate::port::outbound::storage::{CredentialStore, PersistedSession};

/// Authentication state holder, generic over the gateway and the
/// credential store so tests can substitute both.
pub struct SessionStore<G, S> {
    gateway: Arc<G>,
    store: Arc<S>,
    state: RwLock<Session>,
    token_tx: watch::Sender<Option<AuthToken>>,
    settle_delay: Duration,
}

impl<G, S> SessionStore<G, S>
where
    G: CatalogGateway,
    S: CredentialStore,
{
    pub fn new(gateway: Arc<G>, store: Arc<S>) -> Self {
        let (token_tx, _) = watch::channel(None);
        Self {
            gateway,
            store,
            state: RwLock::new(Session::loading()),
            token_tx,
            settle_delay: Duration::ZERO,
        }
    }

    /// Impose a minimum settle time on [`recover`](Self::recover).
    /// Cosmetic, for interactive frontends that would otherwise flash.
    #[must_use]
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// A snapshot of the current session.
    #[must_use]
    pub fn session(&self) -> Session {
        self.state.read().clone()
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.state.read().status()
    }

    #[must_use]
    pub fn token(&self) -> Option<AuthToken> {
        self.state.read().token().cloned()
    }

    /// Subscribe to token changes. Receivers see the current value
    /// immediately and every transition afterwards.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<AuthToken>> {
        self.token_tx.subscribe()
    }

    /// Recover a persisted session at startup.
    ///
    /// Corrupt or partial records are cleared by the store and come back
    /// as `None`; read failures degrade to an anonymous session. Runs
    /// once: calling it on an already-settled store is a no-op.
    pub async fn recover(&self) -> Session {
        if self.status() != SessionStatus::Loading {
            return self.session();
        }

        let recovered = match self.store.load().await {
            Ok(Some(persisted)) => {
                info!(email = %persisted.user.email, "recovered persisted session");
                Session::authenticated(persisted.token, persisted.user)
            }
            Ok(None) => Session::anonymous(),
            Err(err) => {
                warn!(error = %err, "failed to load persisted session");
                Session::anonymous()
            }
        };

        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }

        self.install(recovered)
    }

    /// Exchange credentials for an authenticated session.
    ///
    /// The user identity comes from the token's embedded claims, falling
    /// back to a minimal email-only identity when the token is opaque.
    ///
    /// # Errors
    ///
    /// Fails with [`AuthError`] when the server rejects the credentials,
    /// returns no token, or the call does not complete.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let response = self
            .gateway
            .login(email, password)
            .await
            .map_err(auth_failure)?;
        let token = response
            .token
            .map(AuthToken::new)
            .ok_or(AuthError::MissingToken)?;

        let user = match TokenClaims::decode(&token) {
            Some(claims) => User::from_claims(&claims, email),
            None => User::fallback(email),
        };

        let session = Session::authenticated(token, user);
        self.persist(&session).await;
        Ok(self.install(session))
    }

    /// Create an account, then log in with the same credentials.
    ///
    /// Registration does not itself return a usable session, so this is
    /// always a two-step operation; the richer identity fields from the
    /// registration response win over token claims.
    ///
    /// # Errors
    ///
    /// Fails with [`AuthError`] when either step fails.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<Session> {
        let registered = self
            .gateway
            .register(email, password, display_name)
            .await
            .map_err(auth_failure)?;

        let response = self
            .gateway
            .login(email, password)
            .await
            .map_err(auth_failure)?;
        let token = response
            .token
            .map(AuthToken::new)
            .ok_or(AuthError::MissingToken)?;

        let user = User {
            id: registered.id,
            email: registered.email,
            role: registered.role.unwrap_or_else(|| "User".to_string()),
            display_name: registered.full_name,
            is_active: registered.is_active,
        };

        let session = Session::authenticated(token, user);
        self.persist(&session).await;
        Ok(self.install(session))
    }

    /// Drop the session, in memory and on disk. Never fails.
    pub async fn logout(&self) {
        let session = Session::anonymous();
        self.persist(&session).await;
        self.install(session);
        info!("logged out");
    }

    /// Change the user's subscription tier.
    ///
    /// When the server rotates the token, the fresh token's claims
    /// replace the user identity; otherwise only the role field is
    /// updated locally.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::AuthRequired`] without an active session, or
    /// a [`RemoteError`](crate::error::RemoteError) from the gateway.
    pub async fn change_tier(&self, tier: SubscriptionTier) -> Result<Session> {
        let current = self.session();
        let (token, user) = match (current.token(), current.user()) {
            (Some(token), Some(user)) => (token.clone(), user.clone()),
            _ => return Err(Error::AuthRequired),
        };

        let response = self.gateway.set_membership_role(tier, &token).await?;

        let session = match response.token.map(AuthToken::new) {
            Some(fresh) => {
                let user = match TokenClaims::decode(&fresh) {
                    Some(claims) => User::from_claims(&claims, &user.email),
                    None => User {
                        role: tier_role(tier),
                        ..user
                    },
                };
                Session::authenticated(fresh, user)
            }
            None => Session::authenticated(
                token,
                User {
                    role: tier_role(tier),
                    ..user
                },
            ),
        };

        self.persist(&session).await;
        Ok(self.install(session))
    }

    /// Swap in a new session state and publish the token transition.
    fn install(&self, session: Session) -> Session {
        *self.state.write() = session.clone();
        self.token_tx.send_replace(session.token().cloned());
        session
    }

    /// Write-through to the credential store. Failures are logged, never
    /// surfaced.
    async fn persist(&self, session: &Session) {
        let result = match (session.token(), session.user()) {
            (Some(token), Some(user)) => {
                self.store
                    .save(&PersistedSession {
                        token: token.clone(),
                        user: user.clone(),
                    })
                    .await
            }
            _ => self.store.clear().await,
        };

        if let Err(err) = result {
            warn!(error = %err, "failed to persist session");
        }
    }
}

/// Collapse gateway errors from login/register into the auth taxonomy,
/// preserving the server's message.
fn auth_failure(err: Error) -> Error {
    match err {
        Error::Remote(remote) => AuthError::Rejected(remote.message).into(),
        other => other,
    }
}

fn tier_role(tier: SubscriptionTier) -> String {
    match tier {
        SubscriptionTier::User => "User".to_string(),
        SubscriptionTier::Sommelier => "Sommelier".to_string(),
    }
}
