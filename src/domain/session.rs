//! Session and user identity types.
//!
//! A [`Session`] is the single source of truth for authentication state.
//! Its invariant: a user is present if and only if a token is present, and
//! the session reports [`SessionStatus::Authenticated`] exactly when both
//! are. Construction goes through the provided constructors so the
//! invariant cannot be broken from outside.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::claims::TokenClaims;

/// Opaque bearer token - newtype for type safety.
///
/// Displayed redacted so tokens never leak into logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token value, for the `Authorization` header only.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthToken(<redacted>)")
    }
}

impl fmt::Display for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<redacted>")
    }
}

impl From<String> for AuthToken {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for AuthToken {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// The authenticated user's identity, as decoded from token claims or
/// returned by registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Option<String>,
    pub email: String,
    pub role: String,
    pub display_name: Option<String>,
    pub is_active: Option<bool>,
}

impl User {
    /// Minimal fallback identity used when a token carries no usable
    /// claims: only the email the user logged in with is known.
    pub fn fallback(email: impl Into<String>) -> Self {
        Self {
            id: None,
            email: email.into(),
            role: "User".to_string(),
            display_name: None,
            is_active: None,
        }
    }

    /// Build a user from decoded token claims, falling back to the login
    /// email for anything the claims do not provide.
    pub fn from_claims(claims: &TokenClaims, login_email: &str) -> Self {
        Self {
            id: claims.subject.clone(),
            email: claims
                .email
                .clone()
                .unwrap_or_else(|| login_email.to_string()),
            role: claims.role.clone().unwrap_or_else(|| "User".to_string()),
            display_name: claims.name.clone(),
            is_active: None,
        }
    }
}

/// Subscription tier a user can hold on the catalog service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    User,
    Sommelier,
}

impl fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Sommelier => write!(f, "sommelier"),
        }
    }
}

/// Lifecycle state of the session.
///
/// `Loading` only occurs between process start and the completion of
/// startup recovery; afterwards the session alternates between
/// `Authenticated` and `Anonymous` via login/logout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Loading,
    Authenticated,
    Anonymous,
}

/// Authentication state: token plus user identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    token: Option<AuthToken>,
    user: Option<User>,
    status: SessionStatus,
}

impl Session {
    /// The empty session that exists before startup recovery completes.
    #[must_use]
    pub fn loading() -> Self {
        Self {
            token: None,
            user: None,
            status: SessionStatus::Loading,
        }
    }

    /// A settled session with no credentials.
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            token: None,
            user: None,
            status: SessionStatus::Anonymous,
        }
    }

    /// A settled session holding credentials. Token and user are supplied
    /// together, which is what keeps the presence invariant structural.
    #[must_use]
    pub fn authenticated(token: AuthToken, user: User) -> Self {
        Self {
            token: Some(token),
            user: Some(user),
            status: SessionStatus::Authenticated,
        }
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn token(&self) -> Option<&AuthToken> {
        self.token.as_ref()
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_and_user_presence_agree() {
        let anon = Session::anonymous();
        assert!(anon.token().is_none());
        assert!(anon.user().is_none());
        assert!(!anon.is_authenticated());

        let auth = Session::authenticated(AuthToken::new("T1"), User::fallback("a@b.com"));
        assert!(auth.token().is_some());
        assert!(auth.user().is_some());
        assert!(auth.is_authenticated());
    }

    #[test]
    fn token_debug_is_redacted() {
        let token = AuthToken::new("super-secret");
        assert!(!format!("{token:?}").contains("super-secret"));
        assert!(!format!("{token}").contains("super-secret"));
    }

    #[test]
    fn fallback_user_has_default_role() {
        let user = User::fallback("a@b.com");
        assert_eq!(user.id, None);
        assert_eq!(user.email, "a@b.com");
        assert_eq!(user.role, "User");
    }
}
