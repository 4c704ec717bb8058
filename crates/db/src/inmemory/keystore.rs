//! In-memory key store.

use std::collections::{BTreeMap, BTreeSet};

use bitcoin::PrivateKey;
use chrono::Utc;
use keydump_primitives::{KeyCombination, KeyId};
use tracing::{debug, info, trace};

use crate::{
    chain::ChainMarker,
    errors::{DbError, DbResult},
    keystore::KeyStore,
};

/// A rescan requested through [`KeyStore::rescan_from`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RescanRequest {
    /// Where the rescan starts.
    pub start: ChainMarker,

    /// Whether known transactions are re-examined.
    pub full: bool,
}

/// In-memory key store.
///
/// Does not scan anything; rescan requests are recorded and can be inspected with
/// [`KeyStoreInMemory::rescans`].
#[derive(Debug, Clone, Default)]
pub struct KeyStoreInMemory {
    /// Whether the store refuses access to secrets.
    locked: bool,

    /// key_id -> record
    records: BTreeMap<KeyId, KeyCombination>,

    /// rescans requested so far, oldest first
    rescans: Vec<RescanRequest>,
}

impl KeyStoreInMemory {
    /// Creates an empty, unlocked store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks the store.
    pub fn lock(&mut self) {
        self.locked = true;
    }

    /// Unlocks the store.
    pub fn unlock(&mut self) {
        self.locked = false;
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no record.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over all records, ordered by [`KeyId`].
    pub fn records(&self) -> impl Iterator<Item = (&KeyId, &KeyCombination)> + '_ {
        self.records.iter()
    }

    /// The rescans requested so far, oldest first.
    pub fn rescans(&self) -> &[RescanRequest] {
        &self.rescans
    }

    fn ensure_unlocked(&self) -> DbResult<()> {
        if self.locked {
            return Err(DbError::Locked);
        }

        Ok(())
    }
}

impl KeyStore for KeyStoreInMemory {
    fn is_unlocked(&self) -> bool {
        !self.locked
    }

    fn key_ids(&self) -> BTreeSet<KeyId> {
        self.records.keys().copied().collect()
    }

    fn key_combination(&self, key_id: &KeyId) -> DbResult<Option<KeyCombination>> {
        self.ensure_unlocked()?;

        Ok(self.records.get(key_id).cloned())
    }

    fn insert_key_combination(
        &mut self,
        key_id: KeyId,
        combination: KeyCombination,
    ) -> DbResult<bool> {
        self.ensure_unlocked()?;

        if !combination.is_meaningful() {
            debug!(%key_id, "declining record without keys");
            return Ok(false);
        }

        trace!(%key_id, "storing record");
        self.records.insert(key_id, combination);

        Ok(true)
    }

    fn remove_key_combination(&mut self, key_id: &KeyId) -> DbResult<Option<KeyCombination>> {
        self.ensure_unlocked()?;

        Ok(self.records.remove(key_id))
    }

    fn add_raw_key(&mut self, key: PrivateKey) -> DbResult<bool> {
        self.ensure_unlocked()?;

        let key_id = KeyId::from_private_key(&key);
        let record = match self.records.remove(&key_id) {
            Some(existing) if existing.primary() == Some(&key) => {
                self.records.insert(key_id, existing);
                return Ok(false);
            }
            Some(existing) => existing.with_primary(key),
            None => KeyCombination::from_primary(key).with_created_at(Utc::now().timestamp()),
        };

        trace!(%key_id, "storing raw key");
        self.records.insert(key_id, record);

        Ok(true)
    }

    fn rescan_from(&mut self, start: ChainMarker, full: bool) {
        info!(height = start.height, hash = %start.hash, full, "rescan requested");
        self.rescans.push(RescanRequest { start, full });
    }
}
