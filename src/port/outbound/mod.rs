//! Outbound ports: the remote catalog service and local credential storage.

pub mod gateway;
pub mod storage;

pub use gateway::{
    CatalogGateway, LoginResponse, RegisterResponse, RoleChangeResponse, WineRecord,
};
pub use storage::{CredentialStore, PersistedSession};
