//! Wallet fixtures.

use std::collections::{BTreeMap, BTreeSet};

use bitcoin::PrivateKey;
use keydump_db::{
    chain::ChainMarker,
    errors::{DbError, DbResult},
    inmemory::KeyStoreInMemory,
    keystore::KeyStore,
};
use keydump_primitives::{KeyCombination, KeyId};

use crate::keys::{fixed_key, key_id};

/// Returns the identity a record is stored under: that of its primary key, or of its miner key
/// if it has no primary key.
///
/// # Panics
///
/// If the record holds no key.
pub fn record_key_id(combination: &KeyCombination) -> KeyId {
    combination
        .primary()
        .or(combination.miner())
        .map(key_id)
        .expect("record must hold a key")
}

/// Creates an unlocked wallet holding `records`, each under [`record_key_id`].
pub fn wallet_with(records: impl IntoIterator<Item = KeyCombination>) -> KeyStoreInMemory {
    let mut wallet = KeyStoreInMemory::new();
    for record in records {
        wallet
            .insert_key_combination(record_key_id(&record), record)
            .expect("unlocked wallet must accept records");
    }

    wallet
}

/// Creates an unlocked wallet with `primary_only` records holding just a primary key,
/// `miner_only` records holding just a miner key and `both` records holding both.
///
/// Keys are taken from [`fixed_key`] in order, so repeated calls build equal wallets.
pub fn populated_wallet(primary_only: usize, miner_only: usize, both: usize) -> KeyStoreInMemory {
    let mut next = 0u16;
    let mut take = || {
        let key = fixed_key(next);
        next += 1;
        key
    };

    let mut records = Vec::new();
    for _ in 0..primary_only {
        records.push(KeyCombination::from_primary(take()).with_created_at(1_600_000_000));
    }
    for _ in 0..miner_only {
        records.push(KeyCombination::new(None, Some(take())));
    }
    for _ in 0..both {
        let primary = take();
        records.push(KeyCombination::from_primary(primary).with_miner(take()));
    }

    wallet_with(records)
}

/// A [`KeyStore`] that fails every write, and optionally every read, for a chosen set of
/// identities and delegates everything else to an in-memory store.
#[derive(Debug, Clone, Default)]
pub struct RejectingKeyStore {
    /// The store doing the actual work.
    pub inner: KeyStoreInMemory,

    /// identities whose writes fail -> reason
    rejected: BTreeMap<KeyId, String>,

    unreadable: BTreeSet<KeyId>,
}

impl RejectingKeyStore {
    /// Wraps `inner`.
    pub fn new(inner: KeyStoreInMemory) -> Self {
        Self {
            inner,
            rejected: BTreeMap::new(),
            unreadable: BTreeSet::new(),
        }
    }

    /// Makes every write for `key_id` fail.
    pub fn reject(mut self, key_id: KeyId) -> Self {
        self.rejected
            .insert(key_id, "identity is blacklisted".to_string());
        self
    }

    /// Makes every read of `key_id` fail.
    pub fn unreadable(mut self, key_id: KeyId) -> Self {
        self.unreadable.insert(key_id);
        self
    }

    fn check(&self, key_id: &KeyId) -> DbResult<()> {
        match self.rejected.get(key_id) {
            Some(reason) => Err(DbError::Rejected {
                key_id: *key_id,
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl KeyStore for RejectingKeyStore {
    fn is_unlocked(&self) -> bool {
        self.inner.is_unlocked()
    }

    fn key_ids(&self) -> BTreeSet<KeyId> {
        self.inner.key_ids()
    }

    fn key_combination(&self, key_id: &KeyId) -> DbResult<Option<KeyCombination>> {
        if self.unreadable.contains(key_id) {
            return Err(DbError::Rejected {
                key_id: *key_id,
                reason: "record is unreadable".to_string(),
            });
        }

        self.inner.key_combination(key_id)
    }

    fn insert_key_combination(
        &mut self,
        key_id: KeyId,
        combination: KeyCombination,
    ) -> DbResult<bool> {
        self.check(&key_id)?;
        self.inner.insert_key_combination(key_id, combination)
    }

    fn remove_key_combination(&mut self, key_id: &KeyId) -> DbResult<Option<KeyCombination>> {
        self.check(key_id)?;
        self.inner.remove_key_combination(key_id)
    }

    fn add_raw_key(&mut self, key: PrivateKey) -> DbResult<bool> {
        self.check(&key_id(&key))?;
        self.inner.add_raw_key(key)
    }

    fn rescan_from(&mut self, start: ChainMarker, full: bool) {
        self.inner.rescan_from(start, full);
    }
}
