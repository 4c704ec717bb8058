//! Dump and restore through real files.

use std::fs;

use bitcoin::Network;
use chrono::NaiveDateTime;
use keydump_backup::{
    document::DUMP_TIME_FORMAT,
    dump::dump_wallet,
    errors::BackupError,
    restore::{restore_wallet, ImportStats},
    BackupConfig,
};
use keydump_db::{
    chain::ChainView,
    inmemory::{KeyStoreInMemory, RescanRequest, StaticChainView},
    keystore::KeyStore,
};
use keydump_primitives::{
    dump_string::encode_dump_string, secret::encode_secret, KeyCombination, KeyId,
};
use keydump_test_utils::{
    keys::{fixed_key, generate_key, key_id},
    strategies::arb_key_combination,
    wallet::{populated_wallet, record_key_id, wallet_with, RejectingKeyStore},
};
use proptest::prelude::*;
use serde_json::{json, Value};
use tempfile::tempdir;

fn chain() -> StaticChainView {
    StaticChainView::new(Network::Regtest)
}

fn config() -> BackupConfig {
    BackupConfig::default()
}

fn write_json(dir: &tempfile::TempDir, name: &str, value: &Value) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, serde_json::to_string(value).unwrap()).unwrap();
    path
}

#[test]
fn round_trip_restores_every_record() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wallet.json");
    let source = populated_wallet(3, 2, 4);

    let written = dump_wallet(&source, &chain(), &config(), &path).unwrap();
    assert_eq!(written, 9);

    let mut restored = KeyStoreInMemory::new();
    let imported = restore_wallet(&mut restored, &chain(), &config(), &path).unwrap();

    assert_eq!(imported, 9);
    assert_eq!(
        restored.records().collect::<Vec<_>>(),
        source.records().collect::<Vec<_>>()
    );
}

#[test]
fn document_shape() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wallet.json");
    let tip = bitcoin::BlockHash::from_raw_hash(bitcoin::hashes::Hash::from_byte_array([9; 32]));
    let chain = chain().with_tip(1200, tip);
    let key = fixed_key(0);
    let wallet = wallet_with([KeyCombination::from_primary(key).with_miner(fixed_key(1))]);

    dump_wallet(&wallet, &chain, &config().with_producer("tests"), &path).unwrap();
    let value: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();

    assert_eq!(value["created_by"], json!("tests"));
    assert_eq!(value["best_block_height"], json!(1200));
    assert_eq!(value["best_block_hash"], json!(tip.to_string()));
    let created_at = value["created_at"].as_str().unwrap();
    assert!(NaiveDateTime::parse_from_str(created_at, DUMP_TIME_FORMAT).is_ok());
    assert!(created_at.ends_with('Z'));

    let entries = value["key"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["keyid"], json!(key_id(&key).to_string()));
    assert_eq!(entries[0]["primary_key"], json!(encode_secret(&key)));
    assert_eq!(entries[0]["miner_key"], json!(encode_secret(&fixed_key(1))));
    assert!(entries[0]["pubkey"].is_string());
}

#[test]
fn dump_replaces_existing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wallet.json");
    fs::write(&path, "stale").unwrap();

    dump_wallet(&populated_wallet(1, 0, 0), &chain(), &config(), &path).unwrap();

    let value: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["key"].as_array().unwrap().len(), 1);
    // no temporary file is left behind
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn dump_into_missing_directory_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing").join("wallet.json");

    let err = dump_wallet(&populated_wallet(1, 0, 0), &chain(), &config(), &path).unwrap_err();

    assert!(matches!(err, BackupError::Io { .. }));
    assert!(err.is_file_error());
}

#[test]
fn locked_wallet_touches_no_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wallet.json");
    let mut wallet = populated_wallet(2, 0, 0);
    wallet.lock();

    let err = dump_wallet(&wallet, &chain(), &config(), &path).unwrap_err();
    assert!(matches!(err, BackupError::UnlockRequired));
    assert!(!path.exists());

    let existing = write_json(&dir, "other.json", &json!({ "key": [] }));
    let before = fs::read_to_string(&existing).unwrap();
    let err = restore_wallet(&mut wallet, &chain(), &config(), &existing).unwrap_err();
    assert!(matches!(err, BackupError::UnlockRequired));
    assert_eq!(fs::read_to_string(&existing).unwrap(), before);
    assert!(wallet.rescans().is_empty());
}

#[test]
fn missing_file_imports_nothing() {
    let dir = tempdir().unwrap();
    let mut wallet = KeyStoreInMemory::new();

    let err = restore_wallet(
        &mut wallet,
        &chain(),
        &config(),
        dir.path().join("nope.json"),
    )
    .unwrap_err();

    assert!(matches!(err, BackupError::Io { .. }));
    assert!(wallet.is_empty());
    assert!(wallet.rescans().is_empty());
}

#[test]
fn non_document_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("garbage.json");
    fs::write(&path, "{ not json").unwrap();
    let mut wallet = KeyStoreInMemory::new();

    let err = restore_wallet(&mut wallet, &chain(), &config(), &path).unwrap_err();
    assert!(matches!(err, BackupError::InvalidDocument { .. }));

    let path = write_json(&dir, "nokeys.json", &json!({ "created_by": "x" }));
    let err = restore_wallet(&mut wallet, &chain(), &config(), &path).unwrap_err();
    assert!(matches!(err, BackupError::InvalidDocument { .. }));
    assert!(wallet.rescans().is_empty());
}

#[test]
fn one_bad_keyid_among_ten() {
    let dir = tempdir().unwrap();
    let mut entries: Vec<Value> = (0..9)
        .map(|index| {
            let key = fixed_key(index);
            json!({ "keyid": key_id(&key).to_string(), "primary_key": encode_secret(&key) })
        })
        .collect();
    entries.insert(
        4,
        json!({ "keyid": "not-a-key-id", "primary_key": encode_secret(&fixed_key(99)) }),
    );
    let path = write_json(&dir, "wallet.json", &json!({ "key": entries }));

    let mut wallet = KeyStoreInMemory::new();
    let imported = restore_wallet(&mut wallet, &chain(), &config(), &path).unwrap();

    assert_eq!(imported, 9);
    assert_eq!(wallet.len(), 9);
}

#[test]
fn entries_without_keys_are_skipped() {
    let dir = tempdir().unwrap();
    let key = fixed_key(0);
    let path = write_json(
        &dir,
        "wallet.json",
        &json!({ "key": [
            { "keyid": key_id(&key).to_string(), "primary_key": encode_secret(&key) },
            { "keyid": key_id(&fixed_key(1)).to_string(), "created_at": 7 },
            { "keyid": key_id(&fixed_key(2)).to_string(), "miner_key": "garbage" },
            { "keyid": null, "primary_key": encode_secret(&fixed_key(3)) },
        ] }),
    );

    let mut wallet = KeyStoreInMemory::new();
    let imported = restore_wallet(&mut wallet, &chain(), &config(), &path).unwrap();

    assert_eq!(imported, 1);
    assert_eq!(wallet.key_ids().into_iter().collect::<Vec<_>>(), vec![key_id(&key)]);
    assert!(wallet.records().all(|(_, record)| record.is_meaningful()));
}

#[test]
fn rescan_is_requested_once_even_for_empty_dumps() {
    let dir = tempdir().unwrap();
    let path = write_json(&dir, "wallet.json", &json!({ "key": [] }));
    let chain = chain().with_tip(
        50,
        bitcoin::BlockHash::from_raw_hash(bitcoin::hashes::Hash::from_byte_array([1; 32])),
    );

    let mut wallet = KeyStoreInMemory::new();
    let imported = restore_wallet(&mut wallet, &chain, &config(), &path).unwrap();

    assert_eq!(imported, 0);
    assert_eq!(
        wallet.rescans(),
        &[RescanRequest {
            start: chain.genesis_marker(),
            full: true,
        }]
    );
    assert_eq!(wallet.rescans()[0].start.height, 0);
}

#[test]
fn legacy_percent_escaped_entries_import() {
    let dir = tempdir().unwrap();
    let key = fixed_key(5);
    let path = write_json(
        &dir,
        "legacy.json",
        &json!({ "key": [{
            "keyid": encode_dump_string(&key_id(&key).to_string()),
            "primary_key": encode_dump_string(&format!("\t{}\n", encode_secret(&key))),
        }] }),
    );
    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("%09"));

    let mut wallet = KeyStoreInMemory::new();
    let imported = restore_wallet(&mut wallet, &chain(), &config(), &path).unwrap();

    assert_eq!(imported, 1);
    let record = wallet.key_combination(&key_id(&key)).unwrap().unwrap();
    assert_eq!(record.primary(), Some(&key));
}

#[test]
fn wrong_network_secrets_are_rejected() {
    let dir = tempdir().unwrap();
    let mainnet = generate_key(Network::Bitcoin);
    let path = write_json(
        &dir,
        "wallet.json",
        &json!({ "key": [
            { "keyid": key_id(&mainnet).to_string(), "primary_key": encode_secret(&mainnet) },
        ] }),
    );

    let mut wallet = KeyStoreInMemory::new();
    let imported = restore_wallet(&mut wallet, &chain(), &config(), &path).unwrap();
    assert_eq!(imported, 0);

    let mainnet_config = config().with_network(Network::Bitcoin);
    let imported = restore_wallet(&mut wallet, &chain(), &mainnet_config, &path).unwrap();
    assert_eq!(imported, 1);
}

#[test]
fn store_failures_are_not_fatal() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wallet.json");
    dump_wallet(&populated_wallet(4, 0, 0), &chain(), &config(), &path).unwrap();

    let rejected = key_id(&fixed_key(2));
    let mut wallet = RejectingKeyStore::new(KeyStoreInMemory::new()).reject(rejected);
    let imported = restore_wallet(&mut wallet, &chain(), &config(), &path).unwrap();

    assert_eq!(imported, 3);
    assert!(!wallet.key_ids().contains(&rejected));
    assert_eq!(wallet.inner.rescans().len(), 1);
}

#[test]
fn restore_overwrites_and_keeps_other_records() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wallet.json");
    let primary = fixed_key(0);
    let dumped = wallet_with([KeyCombination::from_primary(primary).with_miner(fixed_key(1))]);
    dump_wallet(&dumped, &chain(), &config(), &path).unwrap();

    let unrelated = fixed_key(7);
    let mut wallet = wallet_with([
        KeyCombination::from_primary(primary),
        KeyCombination::from_primary(unrelated),
    ]);
    restore_wallet(&mut wallet, &chain(), &config(), &path).unwrap();

    assert_eq!(wallet.len(), 2);
    let record = wallet.key_combination(&key_id(&primary)).unwrap().unwrap();
    assert_eq!(record.miner(), Some(&fixed_key(1)));
    assert!(wallet.key_ids().contains(&key_id(&unrelated)));
}

#[test]
fn metadata_passes_through() {
    let dir = tempdir().unwrap();
    let key = fixed_key(0);
    let path = write_json(
        &dir,
        "wallet.json",
        &json!({
            "created_by": "some other wallet",
            "best_block_height": "not a number",
            "key": [{
                "keyid": key_id(&key).to_string(),
                "primary_key": encode_secret(&key),
                "created_at": 1_650_000_000,
                "label": "cold storage",
            }],
        }),
    );

    let mut wallet = KeyStoreInMemory::new();
    restore_wallet(&mut wallet, &chain(), &config(), &path).unwrap();

    let out = dir.path().join("again.json");
    dump_wallet(&wallet, &chain(), &config(), &out).unwrap();
    let value: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();

    assert_eq!(value["key"][0]["label"], json!("cold storage"));
    assert_eq!(value["key"][0]["created_at"], json!(1_650_000_000));
}

#[test]
fn unexpected_field_types_keep_keys() {
    let dir = tempdir().unwrap();
    let keys: Vec<_> = (0..3).map(fixed_key).collect();
    let entry = |index: usize| {
        json!({
            "keyid": key_id(&keys[index]).to_string(),
            "primary_key": encode_secret(&keys[index]),
        })
    };
    let mut entries = vec![entry(0), entry(1), entry(2)];
    entries[0]["created_at"] = json!("2019-01-01T00:00:00Z");
    entries[1]["created_at"] = Value::Null;
    entries[2]["pubkey"] = json!(5);
    let path = write_json(&dir, "wallet.json", &json!({ "key": entries }));

    let mut wallet = KeyStoreInMemory::new();
    let imported = restore_wallet(&mut wallet, &chain(), &config(), &path).unwrap();

    assert_eq!(imported, 3);
    assert_eq!(wallet.len(), 3);
    let record = wallet.key_combination(&key_id(&keys[0])).unwrap().unwrap();
    assert_eq!(record.primary(), Some(&keys[0]));
    assert_eq!(record.metadata().created_at(), None);
    assert_eq!(
        record.metadata().fields()["created_at"],
        json!("2019-01-01T00:00:00Z")
    );
}

#[test]
fn failed_dump_leaves_destination_untouched() {
    let dir = tempdir().unwrap();
    // an existing directory cannot be replaced by the finished dump
    let destination = dir.path().join("wallet.json");
    fs::create_dir(&destination).unwrap();
    let sentinel = destination.join("sentinel");
    fs::write(&sentinel, b"previous backup").unwrap();

    let err = dump_wallet(&populated_wallet(2, 1, 1), &chain(), &config(), &destination)
        .unwrap_err();

    assert!(matches!(err, BackupError::Io { .. }));
    assert!(destination.is_dir());
    assert_eq!(fs::read(&sentinel).unwrap(), b"previous backup");
    assert_eq!(fs::read_dir(&destination).unwrap().count(), 1);
    // the temporary file is cleaned up
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn import_stats_count_skips() {
    let key = fixed_key(0);
    let entries = vec![
        json!({ "keyid": key_id(&key).to_string(), "primary_key": encode_secret(&key) }),
        json!(42),
        json!({ "keyid": KeyId::from_bytes([0; 20]).to_string() }),
    ];

    let mut wallet = KeyStoreInMemory::new();
    let stats = keydump_backup::restore::import_entries(&mut wallet, &config(), &entries);

    assert_eq!(
        stats,
        ImportStats {
            imported: 1,
            skipped: 2,
        }
    );
    assert!(wallet.rescans().is_empty());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn any_wallet_round_trips(records in proptest::collection::vec(arb_key_combination(), 0..8)) {
        let source = wallet_with(records.clone());
        let dir = tempdir().unwrap();
        let path = dir.path().join("wallet.json");

        let written = dump_wallet(&source, &chain(), &config(), &path).unwrap();
        let mut restored = KeyStoreInMemory::new();
        let imported = restore_wallet(&mut restored, &chain(), &config(), &path).unwrap();

        prop_assert_eq!(written, source.len());
        prop_assert_eq!(imported, source.len());
        for record in &records {
            prop_assert!(restored.key_ids().contains(&record_key_id(record)));
        }
        prop_assert_eq!(
            restored.records().collect::<Vec<_>>(),
            source.records().collect::<Vec<_>>()
        );
    }
}
