//! Proptest strategies for the key primitives.

use bitcoin::{NetworkKind, PrivateKey};
use keydump_primitives::{KeyCombination, KeyMetadata};
use proptest::prelude::*;
use secp256k1::SecretKey;
use serde_json::{Map, Value};

/// Generates compressed test-network keys.
pub fn arb_private_key() -> impl Strategy<Value = PrivateKey> {
    any::<[u8; 32]>()
        .prop_filter_map("not a valid secret key", |bytes| {
            SecretKey::from_slice(&bytes).ok()
        })
        .prop_map(|secret| PrivateKey::new(secret, NetworkKind::Test))
}

/// Generates metadata with a few pass-through fields.
pub fn arb_metadata() -> impl Strategy<Value = KeyMetadata> {
    (
        0i64..=4_000_000_000,
        proptest::collection::btree_map("[a-z]{1,8}", "[ -~]{0,16}", 0..3),
    )
        .prop_map(|(created_at, labels)| {
            let fields: Map<String, Value> = labels
                .into_iter()
                // keep clear of the fields the record itself serializes
                .map(|(name, value)| (format!("x_{name}"), Value::String(value)))
                .collect();
            let mut metadata = KeyMetadata::from(fields);
            metadata.set_created_at(created_at);
            metadata
        })
}

/// Generates records holding at least one key.
pub fn arb_key_combination() -> impl Strategy<Value = KeyCombination> {
    (
        proptest::option::of(arb_private_key()),
        proptest::option::of(arb_private_key()),
        arb_metadata(),
    )
        .prop_filter("record must hold a key", |(primary, miner, _)| {
            primary.is_some() || miner.is_some()
        })
        .prop_map(|(primary, miner, metadata)| {
            KeyCombination::new(primary, miner).with_metadata(metadata)
        })
}
