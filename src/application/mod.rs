//! Application services: the session store and the per-collection
//! optimistic synchronizer.

pub mod session;
pub mod sync;

pub use session::SessionStore;
pub use sync::{CollectionSync, SyncStatus};
