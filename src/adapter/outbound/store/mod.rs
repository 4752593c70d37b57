//! Local credential persistence.

mod file;

pub use file::FileCredentialStore;
