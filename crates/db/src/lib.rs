//! Collaborator interfaces around which wallet backups are built.
//!
//! [`keystore::KeyStore`] is the wallet's authoritative key store and [`chain::ChainView`] is the
//! wallet's view of the best chain. The [`inmemory`] module contains implementations that keep
//! everything in memory, used by tests and by offline tooling.

pub mod chain;
pub mod errors;
pub mod inmemory;
pub mod keystore;
