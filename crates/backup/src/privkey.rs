//! Single-key export and import.

use keydump_db::{chain::ChainView, keystore::KeyStore};
use keydump_primitives::{
    secret::{decode_secret, encode_secret},
    KeyId,
};
use serde::Serialize;
use tracing::info;

use crate::{
    config::BackupConfig,
    errors::{ensure_unlocked, BackupError, BackupResult},
};

/// The secrets of one identity, encoded as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DumpedKey {
    /// The primary key.
    pub primary: String,

    /// The miner key, present only if the identity has one distinct from its primary key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub miner: Option<String>,
}

/// Returns the encoded secrets of `key_id`.
///
/// Fails with [`BackupError::KeyNotFound`] if the wallet holds no primary key for it.
pub fn dump_private_key<W>(wallet: &W, key_id: &KeyId) -> BackupResult<DumpedKey>
where
    W: KeyStore + ?Sized,
{
    ensure_unlocked(wallet)?;

    let combination = wallet
        .key_combination(key_id)?
        .ok_or(BackupError::KeyNotFound(*key_id))?;
    let primary = combination
        .primary()
        .ok_or(BackupError::KeyNotFound(*key_id))?;

    Ok(DumpedKey {
        primary: encode_secret(primary),
        miner: combination
            .miner()
            .filter(|miner| *miner != primary)
            .map(encode_secret),
    })
}

/// Decodes `secret` and adds it to `wallet` as a primary key, returning its identity.
///
/// Importing a key the wallet already holds is not an error.
pub fn import_private_key<W>(
    wallet: &mut W,
    config: &BackupConfig,
    secret: &str,
) -> BackupResult<KeyId>
where
    W: KeyStore + ?Sized,
{
    ensure_unlocked(wallet)?;

    let key = decode_secret(secret, config.network())?;
    let key_id = KeyId::from_private_key(&key);

    if wallet.add_raw_key(key)? {
        info!(%key_id, "private key imported");
    } else {
        info!(%key_id, "private key already in wallet");
    }

    Ok(key_id)
}

/// Same as [`import_private_key`], followed by a full rescan from the genesis block.
pub fn import_private_key_and_rescan<W, C>(
    wallet: &mut W,
    chain: &C,
    config: &BackupConfig,
    secret: &str,
) -> BackupResult<KeyId>
where
    W: KeyStore + ?Sized,
    C: ChainView + ?Sized,
{
    let key_id = import_private_key(wallet, config, secret)?;
    wallet.rescan_from(chain.genesis_marker(), true);

    Ok(key_id)
}
