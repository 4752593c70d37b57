//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`gateway`] — [`MockGateway`], a scripted
//!   [`CatalogGateway`](crate::port::outbound::CatalogGateway) that
//!   records every call and can hold fetches open behind gates.
//! - [`store`] — [`MemoryCredentialStore`], an in-memory
//!   [`CredentialStore`](crate::port::outbound::CredentialStore) with
//!   injectable failures.

pub mod gateway;
pub mod store;

pub use gateway::{GatewayCall, MockGateway};
pub use store::MemoryCredentialStore;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

/// Build a JWT-shaped token whose payload is `claims`, unsigned.
#[must_use]
pub fn jwt_with_claims(claims: &serde_json::Value) -> String {
    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims).expect("serializable claims"));
    format!("eyJhbGciOiJIUzI1NiJ9.{payload}.sig")
}
