//! Errors for the key primitives.

use bitcoin::{key::FromWifError, NetworkKind};
use thiserror::Error;

/// Error while parsing a [`KeyId`](crate::KeyId) from its text form.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KeyIdError {
    /// The text is not valid hex.
    #[error("key id is not valid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// The decoded bytes do not have the length of a key identity hash.
    #[error("key id must be exactly 20 bytes, got {0} bytes")]
    InvalidLength(usize),
}

/// Error while decoding a secret key from its text encoding.
#[derive(Debug, Error)]
pub enum SecretError {
    /// The text failed base58, checksum or length validation.
    #[error("invalid private key encoding: {0}")]
    Encoding(#[from] FromWifError),

    /// The key is well-formed but was encoded for another network.
    #[error("private key is encoded for {found:?} network, expected {expected:?}")]
    WrongNetwork {
        /// The network kind the caller expected.
        expected: NetworkKind,

        /// The network kind found in the encoding.
        found: NetworkKind,
    },
}
