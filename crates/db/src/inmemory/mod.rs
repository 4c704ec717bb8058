//! In-memory implementations of the collaborator interfaces.

pub mod chain;
pub mod keystore;

pub use chain::{Registration, StaticChainView};
pub use keystore::{KeyStoreInMemory, RescanRequest};
