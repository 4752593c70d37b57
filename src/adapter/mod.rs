//! Adapters binding the ports to concrete technology: the HTTP catalog
//! service, the on-disk credential store, and the CLI.

pub mod inbound;
pub mod outbound;
