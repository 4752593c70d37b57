//! Decanter - wine catalog client with optimistic collection sync.
//!
//! The core of this crate is the client-side state synchronization
//! pattern for user-owned collections against a remote authority:
//! load on session change, flip locally before the network confirms,
//! roll back on failure.
//!
//! # Modules
//!
//! - [`config`] - Configuration loading from TOML files
//! - [`domain`] - Ids, sessions, token claims, the mutation state machine
//! - [`port`] - Trait seams: the catalog gateway and credential storage
//! - [`adapter`] - HTTP gateway, file credential store, CLI
//! - [`application`] - [`SessionStore`](application::SessionStore) and
//!   [`CollectionSync`](application::CollectionSync)
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use decanter::adapter::outbound::http::HttpCatalogGateway;
//! use decanter::adapter::outbound::store::FileCredentialStore;
//! use decanter::application::{CollectionSync, SessionStore};
//! use decanter::domain::CollectionKind;
//!
//! # async fn example() -> decanter::error::Result<()> {
//! let gateway = Arc::new(HttpCatalogGateway::new(
//!     "https://api.example.com",
//!     std::time::Duration::from_secs(15),
//! )?);
//! let store = Arc::new(FileCredentialStore::default_location());
//! let session = SessionStore::new(Arc::clone(&gateway), store);
//! session.recover().await;
//!
//! let favorites = CollectionSync::new(
//!     CollectionKind::Favorites,
//!     Arc::clone(&gateway),
//!     session.subscribe(),
//! );
//! favorites.reload().await?;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
