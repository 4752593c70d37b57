//! Best-effort decoding of claims embedded in a bearer token.
//!
//! The backend issues JWTs whose payload carries the user's identity, which
//! lets the client populate profile fields without an extra round-trip.
//! Decoding is strictly best-effort: any malformed segment yields `None`
//! and the caller falls back to a minimal identity. The signature is never
//! verified here - the token is an opaque credential as far as this client
//! is concerned.

use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use serde_json::Value;

use super::session::AuthToken;

// The backend is ASP.NET, which emits claims under the long-form schema
// URIs rather than the compact JWT names.
const MS_NAMEID: &str =
    "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/nameidentifier";
const MS_EMAIL: &str =
    "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/emailaddress";
const MS_NAME: &str = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/name";
const MS_ROLE: &str = "http://schemas.microsoft.com/ws/2008/06/identity/claims/role";

/// Identity assertions extracted from a token payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenClaims {
    pub subject: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub name: Option<String>,
}

impl TokenClaims {
    /// Decode the payload segment of a JWT-shaped token.
    ///
    /// Returns `None` when the token is not three dot-separated segments,
    /// the payload is not valid base64url, or the decoded bytes are not a
    /// JSON object.
    #[must_use]
    pub fn decode(token: &AuthToken) -> Option<Self> {
        let payload = token.expose().split('.').nth(1)?;
        if token.expose().split('.').count() != 3 {
            return None;
        }

        let bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .or_else(|_| URL_SAFE.decode(payload))
            .ok()?;
        let value: Value = serde_json::from_slice(&bytes).ok()?;
        let object = value.as_object()?;

        let claims = Self {
            subject: string_claim(object, &["sub", "nameid", MS_NAMEID]),
            email: string_claim(object, &["email", MS_EMAIL]),
            role: string_claim(object, &["role", MS_ROLE]),
            name: string_claim(object, &["unique_name", "name", MS_NAME]),
        };

        if claims == Self::default() {
            None
        } else {
            Some(claims)
        }
    }
}

fn string_claim(object: &serde_json::Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match object.get(*key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
