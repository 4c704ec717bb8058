//! Secondary "miner" key management.
//!
//! A registered identity may delegate block production to a separate miner key. Once a dedicated
//! mining wallet holds the miner keys it needs, the spending wallet can drop them so that only
//! the primary keys remain there.

use keydump_db::{chain::ChainView, keystore::KeyStore};
use tracing::{debug, info, warn};

use crate::errors::{ensure_unlocked, BackupError, BackupResult};

/// Whether `wallet` holds at least one miner key whose identity is registered on chain.
///
/// A locked wallet is never ready.
pub fn is_ready_for_secondary_mining<W, C>(wallet: &W, chain: &C) -> bool
where
    W: KeyStore + ?Sized,
    C: ChainView + ?Sized,
{
    wallet
        .key_ids()
        .into_iter()
        .filter(|key_id| chain.is_registered(key_id))
        .any(|key_id| match wallet.key_combination(&key_id) {
            Ok(combination) => combination.is_some_and(|combination| combination.has_miner()),
            Err(err) => {
                warn!(%key_id, %err, "cannot read record, treating it as holding no miner key");
                false
            }
        })
}

/// Removes the miner key from every record of `wallet` and returns the number of records
/// changed.
///
/// Records left without any key are deleted. Fails with [`BackupError::PreconditionFailed`]
/// unless [`is_ready_for_secondary_mining`] holds.
///
/// Every record is read before the first write, so a failing read changes nothing. A store error
/// during the writes is returned as is and leaves the records written before it stripped; calling
/// again finishes the job.
pub fn clear_all_secondary_mining_keys<W, C>(wallet: &mut W, chain: &C) -> BackupResult<usize>
where
    W: KeyStore + ?Sized,
    C: ChainView + ?Sized,
{
    ensure_unlocked(wallet)?;

    if !is_ready_for_secondary_mining(wallet, chain) {
        return Err(BackupError::PreconditionFailed(
            "wallet holds no miner key of a registered identity",
        ));
    }

    let mut stripped = Vec::new();
    for key_id in wallet.key_ids() {
        match wallet.key_combination(&key_id)? {
            Some(combination) if combination.has_miner() => {
                stripped.push((key_id, combination.without_miner()));
            }
            _ => {}
        }
    }

    let cleared = stripped.len();
    for (key_id, combination) in stripped {
        if combination.is_meaningful() {
            wallet.insert_key_combination(key_id, combination)?;
        } else {
            debug!(%key_id, "deleting record left without keys");
            wallet.remove_key_combination(&key_id)?;
        }
    }

    info!(cleared, "miner keys cleared");

    Ok(cleared)
}
