//! Catalog-agnostic domain types: identifiers, sessions, collection kinds,
//! and the per-mutation state machine.

pub mod claims;
pub mod collection;
pub mod id;
pub mod mutation;
pub mod session;

pub use claims::TokenClaims;
pub use collection::CollectionKind;
pub use id::WineId;
pub use mutation::{Mutation, MutationPhase};
pub use session::{AuthToken, Session, SessionStatus, SubscriptionTier, User};
