//! Errors raised by backup operations.

use std::{io, path::PathBuf};

use keydump_db::{errors::DbError, keystore::KeyStore};
use keydump_primitives::{
    errors::{KeyIdError, SecretError},
    KeyId,
};
use thiserror::Error;

/// Error returned by the backup operations.
#[derive(Debug, Error)]
pub enum BackupError {
    /// The wallet is locked and the operation needs its secrets.
    #[error("wallet is locked, unlock it first")]
    UnlockRequired,

    /// A file could not be read or written.
    #[error("cannot access {}: {source}", .path.display())]
    Io {
        /// The file.
        path: PathBuf,

        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// The file is not a wallet dump.
    #[error("{} is not a wallet dump: {reason}", .path.display())]
    InvalidDocument {
        /// The file.
        path: PathBuf,

        /// What is wrong with it.
        reason: String,
    },

    /// A secret key could not be decoded.
    #[error("invalid private key encoding: {0}")]
    InvalidKeyEncoding(#[from] SecretError),

    /// The wallet holds no key for the identity.
    #[error("no private key for {0}")]
    KeyNotFound(KeyId),

    /// The wallet is not in the state the operation requires.
    #[error("precondition failed: {0}")]
    PreconditionFailed(&'static str),

    /// The key store failed.
    #[error("key store: {0}")]
    KeyStore(#[from] DbError),
}

impl BackupError {
    /// Whether the error concerns a file rather than the wallet.
    pub const fn is_file_error(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::InvalidDocument { .. })
    }
}

/// Wrapper for the result of a backup operation.
pub type BackupResult<T> = Result<T, BackupError>;

/// Why a single entry of a dump was not imported.
///
/// Entry errors never abort a restore: the entry is logged and skipped.
#[derive(Debug, Error)]
pub enum EntryError {
    /// The entry is not a JSON object.
    #[error("entry is not an object")]
    NotAnObject,

    /// The entry has no identity.
    #[error("entry has no keyid")]
    MissingKeyId,

    /// The identity is not a string.
    #[error("keyid is not a string")]
    KeyIdNotText,

    /// The identity does not parse.
    #[error("invalid keyid: {0}")]
    InvalidKeyId(#[from] KeyIdError),

    /// Neither key role holds a usable key.
    #[error("no usable key for {0}")]
    NoKeys(KeyId),

    /// The key store did not accept the record.
    #[error("record for {0} was declined")]
    Declined(KeyId),

    /// The key store failed while storing the record.
    #[error("cannot store record for {key_id}: {source}")]
    Store {
        /// The identity of the record.
        key_id: KeyId,

        /// The underlying error.
        #[source]
        source: DbError,
    },
}

/// Fails with [`BackupError::UnlockRequired`] unless `wallet` is unlocked.
pub(crate) fn ensure_unlocked<W: KeyStore + ?Sized>(wallet: &W) -> BackupResult<()> {
    if !wallet.is_unlocked() {
        return Err(BackupError::UnlockRequired);
    }

    Ok(())
}
