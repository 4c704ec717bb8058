//! This module defines the [`KeyStore`] trait, the wallet's authoritative store of key
//! combination records.

use std::collections::BTreeSet;

use bitcoin::PrivateKey;
use keydump_primitives::{KeyCombination, KeyId};

use crate::{chain::ChainMarker, errors::DbResult};

/// Interface to the keys a wallet holds.
///
/// Mutating methods take `&mut self`: a caller sharing a wallet between threads holds its lock
/// guard for the whole backup operation, which gives each dump or restore exclusive access to
/// the store.
pub trait KeyStore {
    /// Whether secret keys can currently be read and written.
    fn is_unlocked(&self) -> bool;

    /// Returns every [`KeyId`] known to the store.
    fn key_ids(&self) -> BTreeSet<KeyId>;

    /// Returns the record stored under `key_id`.
    fn key_combination(&self, key_id: &KeyId) -> DbResult<Option<KeyCombination>>;

    /// Stores `combination` under `key_id`, replacing any previous record.
    ///
    /// Returns `false` if the store declined the record without failing, e.g. because it holds no
    /// key at all.
    fn insert_key_combination(
        &mut self,
        key_id: KeyId,
        combination: KeyCombination,
    ) -> DbResult<bool>;

    /// Removes and returns the record stored under `key_id`.
    fn remove_key_combination(&mut self, key_id: &KeyId) -> DbResult<Option<KeyCombination>>;

    /// Adds `key` as the primary key of the identity derived from its public key.
    ///
    /// Returns `false` if the store already held that exact primary key.
    fn add_raw_key(&mut self, key: PrivateKey) -> DbResult<bool>;

    /// Requests a rescan of the wallet's transaction history starting at `start`.
    ///
    /// With `full` set, transactions already known to the wallet are re-examined too.
    fn rescan_from(&mut self, start: ChainMarker, full: bool);
}
