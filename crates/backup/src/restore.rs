//! Restoring wallet dumps.

use std::{fs, path::Path};

use keydump_db::{chain::ChainView, keystore::KeyStore};
use keydump_primitives::{KeyCombination, KeyId};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    config::BackupConfig,
    document::{parse_entry, ParsedDocument},
    errors::{ensure_unlocked, BackupError, BackupResult, EntryError},
};

/// What happened to the entries of a dump.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportStats {
    /// Entries stored in the wallet.
    pub imported: usize,

    /// Entries logged and left out.
    pub skipped: usize,
}

/// Imports every entry of the dump at `source` into `wallet`, then requests a full rescan from
/// the genesis block.
///
/// Returns the number of entries stored. Entries that cannot be imported are logged and skipped;
/// only an unusable file or a locked wallet fails the restore. Records already in the wallet are
/// replaced by the dumped ones. The rescan is requested even if nothing was imported.
pub fn restore_wallet<W, C>(
    wallet: &mut W,
    chain: &C,
    config: &BackupConfig,
    source: impl AsRef<Path>,
) -> BackupResult<usize>
where
    W: KeyStore + ?Sized,
    C: ChainView + ?Sized,
{
    let source = source.as_ref();
    ensure_unlocked(wallet)?;

    let document = read_document(source)?;
    info!(
        path = %source.display(),
        entries = document.entries.len(),
        created_by = document.provenance.created_by.as_deref().unwrap_or("unknown"),
        "importing wallet dump"
    );

    let stats = import_entries(wallet, config, &document.entries);

    info!(
        imported = stats.imported,
        skipped = stats.skipped,
        "wallet dump imported, rescanning from genesis"
    );
    wallet.rescan_from(chain.genesis_marker(), true);

    Ok(stats.imported)
}

/// Reads and parses the top level of the dump at `source`.
pub fn read_document(source: &Path) -> BackupResult<ParsedDocument> {
    let text = fs::read_to_string(source).map_err(|err| BackupError::Io {
        path: source.to_path_buf(),
        source: err,
    })?;

    ParsedDocument::from_json(&text).map_err(|reason| BackupError::InvalidDocument {
        path: source.to_path_buf(),
        reason,
    })
}

/// Imports `entries` into `wallet`, one by one, and counts the outcomes.
///
/// Does not rescan.
pub fn import_entries<W>(wallet: &mut W, config: &BackupConfig, entries: &[Value]) -> ImportStats
where
    W: KeyStore + ?Sized,
{
    let mut stats = ImportStats::default();

    for (index, entry) in entries.iter().enumerate() {
        match import_entry(wallet, config, entry) {
            Ok(key_id) => {
                debug!(index, %key_id, "imported record");
                stats.imported += 1;
            }
            Err(err) => {
                warn!(index, %err, "skipping wallet dump entry");
                stats.skipped += 1;
            }
        }
    }

    stats
}

fn import_entry<W>(wallet: &mut W, config: &BackupConfig, entry: &Value) -> Result<KeyId, EntryError>
where
    W: KeyStore + ?Sized,
{
    let (key_id, fields) = parse_entry(entry)?;

    let combination = KeyCombination::from_fields(fields, config.network());
    if !combination.is_meaningful() {
        return Err(EntryError::NoKeys(key_id));
    }

    match wallet.insert_key_combination(key_id, combination) {
        Ok(true) => Ok(key_id),
        Ok(false) => Err(EntryError::Declined(key_id)),
        Err(source) => Err(EntryError::Store { key_id, source }),
    }
}
