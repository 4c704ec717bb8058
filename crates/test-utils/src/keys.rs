//! Module to generate keys for testing.

use bitcoin::{key::rand::rngs::OsRng, NetworkKind, PrivateKey, PublicKey};
use keydump_primitives::KeyId;
use secp256k1::{SecretKey, SECP256K1};

/// Returns the compressed test-network key derived from `index`.
///
/// The same index always yields the same key and distinct indices yield distinct keys.
pub fn fixed_key(index: u16) -> PrivateKey {
    let mut bytes = [0u8; 32];
    bytes[0] = 0x42;
    bytes[30..].copy_from_slice(&index.to_be_bytes());

    let secret = SecretKey::from_slice(&bytes).expect("must be a valid secret key");
    PrivateKey::new(secret, NetworkKind::Test)
}

/// Generates a random compressed key for `network`.
pub fn generate_key(network: impl Into<NetworkKind>) -> PrivateKey {
    PrivateKey::new(SecretKey::new(&mut OsRng), network)
}

/// Returns the identity of `key`.
pub fn key_id(key: &PrivateKey) -> KeyId {
    KeyId::from_public_key(&PublicKey::from_private_key(SECP256K1, key))
}
