//! Key store errors.

use keydump_primitives::KeyId;
use thiserror::Error;

/// Errors that can occur when interacting with a key store.
#[derive(Debug, Error)]
pub enum DbError {
    /// The key store refuses access to secret keys while locked.
    #[error("key store is locked")]
    Locked,

    /// The key store refused to store a record.
    #[error("key store rejected {key_id}: {reason}")]
    Rejected {
        /// The identity of the rejected record.
        key_id: KeyId,

        /// Why the record was rejected.
        reason: String,
    },
}

/// Result type of key store operations.
pub type DbResult<T> = Result<T, DbError>;
