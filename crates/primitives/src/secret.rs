//! Text encoding of secret keys.
//!
//! Secret keys travel as base58check WIF strings, both in full wallet dumps and when a single key
//! is dumped or imported. The encoding is self-describing: it carries the network kind and the
//! public key compression flag next to the 32 secret bytes.

use bitcoin::{NetworkKind, PrivateKey};

use crate::errors::SecretError;

/// Encodes `key` as a WIF string.
pub fn encode_secret(key: &PrivateKey) -> String {
    key.to_wif()
}

/// Decodes a WIF string into exactly one [`PrivateKey`].
///
/// Surrounding whitespace is ignored. Keys encoded for a network kind other than `expected` are
/// rejected.
pub fn decode_secret(
    text: &str,
    expected: impl Into<NetworkKind>,
) -> Result<PrivateKey, SecretError> {
    let expected = expected.into();
    let key = PrivateKey::from_wif(text.trim())?;

    if key.network != expected {
        return Err(SecretError::WrongNetwork {
            expected,
            found: key.network,
        });
    }

    Ok(key)
}
