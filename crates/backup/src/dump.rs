//! Writing wallet dumps.

use std::{
    io::{self, Write},
    path::Path,
};

use chrono::{DateTime, Utc};
use keydump_db::{chain::ChainView, keystore::KeyStore};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::{
    config::BackupConfig,
    document::{BackupDocument, BackupEntry, DUMP_TIME_FORMAT},
    errors::{ensure_unlocked, BackupError, BackupResult},
};

/// Writes every key of `wallet` to `destination` and returns the number of entries written.
///
/// The wallet is borrowed for the whole dump, so no record can change while the document is
/// assembled. The file is written next to `destination` and renamed into place once complete, so
/// an existing file at `destination` is either fully replaced or left untouched.
pub fn dump_wallet<W, C>(
    wallet: &W,
    chain: &C,
    config: &BackupConfig,
    destination: impl AsRef<Path>,
) -> BackupResult<usize>
where
    W: KeyStore + ?Sized,
    C: ChainView + ?Sized,
{
    dump_wallet_at(wallet, chain, config, destination, Utc::now())
}

/// Same as [`dump_wallet`] with an explicit dump time.
pub fn dump_wallet_at<W, C>(
    wallet: &W,
    chain: &C,
    config: &BackupConfig,
    destination: impl AsRef<Path>,
    now: DateTime<Utc>,
) -> BackupResult<usize>
where
    W: KeyStore + ?Sized,
    C: ChainView + ?Sized,
{
    let destination = destination.as_ref();
    let document = build_document(wallet, chain, config, now)?;
    let count = document.key.len();

    let rendered =
        serde_json::to_string_pretty(&document).map_err(|err| BackupError::InvalidDocument {
            path: destination.to_path_buf(),
            reason: err.to_string(),
        })?;
    write_atomically(destination, rendered.as_bytes())?;

    info!(count, path = %destination.display(), "wallet dumped");

    Ok(count)
}

/// Assembles the dump of `wallet` without writing it anywhere.
///
/// Entries appear in [`KeyId`](keydump_primitives::KeyId) order. Records without any key are left
/// out.
pub fn build_document<W, C>(
    wallet: &W,
    chain: &C,
    config: &BackupConfig,
    now: DateTime<Utc>,
) -> BackupResult<BackupDocument>
where
    W: KeyStore + ?Sized,
    C: ChainView + ?Sized,
{
    ensure_unlocked(wallet)?;

    let mut key = Vec::new();
    for key_id in wallet.key_ids() {
        let Some(combination) = wallet.key_combination(&key_id)? else {
            continue;
        };

        if !combination.is_meaningful() {
            debug!(%key_id, "leaving record without keys out of the dump");
            continue;
        }

        key.push(BackupEntry {
            keyid: key_id,
            fields: combination.to_fields(),
        });
    }

    Ok(BackupDocument {
        created_by: config.producer().to_string(),
        created_at: now.format(DUMP_TIME_FORMAT).to_string(),
        best_block_height: chain.best_height(),
        best_block_hash: chain.best_hash().to_string(),
        key,
    })
}

fn write_atomically(destination: &Path, contents: &[u8]) -> BackupResult<()> {
    let io_error = |source: io::Error| BackupError::Io {
        path: destination.to_path_buf(),
        source,
    };

    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(io_error)?;
    file.write_all(contents).map_err(io_error)?;
    file.as_file().sync_all().map_err(io_error)?;
    file.persist(destination)
        .map_err(|err| io_error(err.error))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use keydump_db::inmemory::{KeyStoreInMemory, StaticChainView};
    use keydump_primitives::KeyCombination;
    use keydump_test_utils::keys::fixed_key;

    use super::*;

    #[test]
    fn empty_wallet_has_empty_key_array() {
        let wallet = KeyStoreInMemory::new();
        let chain = StaticChainView::new(bitcoin::Network::Regtest);
        let now = DateTime::from_timestamp(1_714_564_800, 0).unwrap();

        let document = build_document(&wallet, &chain, &BackupConfig::default(), now).unwrap();

        assert!(document.key.is_empty());
        assert_eq!(document.created_at, "2024-05-01T12:00:00Z");
        assert_eq!(document.best_block_height, 0);
        assert_eq!(
            document.best_block_hash,
            chain.genesis_marker().hash.to_string()
        );
    }

    #[test]
    fn entries_follow_key_id_order() {
        let mut wallet = KeyStoreInMemory::new();
        for index in 0..5 {
            let key = fixed_key(index);
            wallet
                .insert_key_combination(
                    keydump_primitives::KeyId::from_private_key(&key),
                    KeyCombination::from_primary(key),
                )
                .unwrap();
        }
        let chain = StaticChainView::new(bitcoin::Network::Regtest);

        let document =
            build_document(&wallet, &chain, &BackupConfig::default(), Utc::now()).unwrap();

        let ids: Vec<_> = document.key.iter().map(|entry| entry.keyid).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids.len(), 5);
        assert_eq!(ids, sorted);
    }

    #[test]
    fn locked_wallet_is_refused() {
        let mut wallet = KeyStoreInMemory::new();
        wallet.lock();
        let chain = StaticChainView::new(bitcoin::Network::Regtest);

        let result = build_document(&wallet, &chain, &BackupConfig::default(), Utc::now());
        assert!(matches!(result, Err(BackupError::UnlockRequired)));
    }
}
