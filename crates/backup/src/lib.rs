//! Wallet key backup and restore.
//!
//! A backup ("wallet dump") is a plaintext JSON document listing every key a wallet holds, one
//! [`KeyCombination`](keydump_primitives::KeyCombination) per [`KeyId`](keydump_primitives::KeyId),
//! next to some provenance metadata. [`dump::dump_wallet`] writes one and
//! [`restore::restore_wallet`] reads one back into a wallet and asks for a rescan.
//!
//! The [`miner`] module manages the secondary "miner" keys and the [`privkey`] module moves single
//! keys in and out of a wallet.

pub mod config;
pub mod document;
pub mod dump;
pub mod errors;
pub mod miner;
pub mod privkey;
pub mod restore;

pub use config::BackupConfig;
pub use dump::dump_wallet;
pub use errors::{BackupError, BackupResult};
pub use miner::{clear_all_secondary_mining_keys, is_ready_for_secondary_mining};
pub use privkey::{dump_private_key, import_private_key};
pub use restore::restore_wallet;
