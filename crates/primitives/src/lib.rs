//! This crate contains the types and pure functions shared by every crate in this workspace: key
//! identities, the secret-key text encoding, the key combination record and the legacy dump-string
//! codec.
//!
//! It lies at the bottom of the crate-hierarchy in this workspace i.e., it does not depend on any
//! other crate in this workspace.

pub mod combination;
pub mod dump_string;
pub mod errors;
pub mod key_id;
pub mod secret;

pub use combination::{KeyCombination, KeyCombinationFields, KeyMetadata};
pub use key_id::KeyId;
