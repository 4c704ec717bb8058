//! Key identities.

use std::{fmt, str::FromStr};

use bitcoin::{hashes::Hash, PrivateKey, PublicKey};
use secp256k1::SECP256K1;
use serde::{Deserialize, Serialize};

use crate::errors::KeyIdError;

/// Length of a [`KeyId`] in bytes.
pub const KEY_ID_LEN: usize = 20;

/// The hash160 of a public key, used as the lookup key of a wallet entry.
///
/// The canonical text form is the lowercase hex of the bytes in storage order, so that
/// [`fmt::Display`] and [`FromStr`] are exact inverses.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyId([u8; KEY_ID_LEN]);

impl KeyId {
    /// Creates a [`KeyId`] from raw hash bytes.
    pub const fn from_bytes(bytes: [u8; KEY_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Derives the [`KeyId`] of a public key.
    pub fn from_public_key(pubkey: &PublicKey) -> Self {
        Self(pubkey.pubkey_hash().to_byte_array())
    }

    /// Derives the [`KeyId`] of the public key belonging to `key`.
    pub fn from_private_key(key: &PrivateKey) -> Self {
        Self::from_public_key(&key.public_key(SECP256K1))
    }

    /// Returns the raw hash bytes.
    pub const fn as_bytes(&self) -> &[u8; KEY_ID_LEN] {
        &self.0
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyId({self})")
    }
}

impl FromStr for KeyId {
    type Err = KeyIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)?;
        let len = bytes.len();
        let bytes: [u8; KEY_ID_LEN] = bytes
            .try_into()
            .map_err(|_| KeyIdError::InvalidLength(len))?;

        Ok(Self(bytes))
    }
}

impl Serialize for KeyId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for KeyId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
