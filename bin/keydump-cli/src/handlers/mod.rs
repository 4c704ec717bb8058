//! Subcommand handlers.

pub(crate) mod decode_string;
pub(crate) mod import_key;
pub(crate) mod inspect;
pub(crate) mod merge;
pub(crate) mod strip_miner;

use std::path::Path;

use anyhow::{Context, Result};
use keydump_backup::{dump_wallet, restore_wallet};
use keydump_db::inmemory::{KeyStoreInMemory, StaticChainView};

use crate::params::Params;

/// Restores the dump at `path` into `wallet`, refusing oversized files.
pub(crate) fn load_into(
    wallet: &mut KeyStoreInMemory,
    chain: &StaticChainView,
    params: &Params,
    path: &Path,
) -> Result<usize> {
    params.check_document_size(path)?;

    restore_wallet(wallet, chain, &params.backup, path)
        .with_context(|| format!("failed to restore {}", path.display()))
}

/// Dumps `wallet` to `out`.
pub(crate) fn write_dump(
    wallet: &KeyStoreInMemory,
    chain: &StaticChainView,
    params: &Params,
    out: &Path,
) -> Result<usize> {
    dump_wallet(wallet, chain, &params.backup, out)
        .with_context(|| format!("failed to write {}", out.display()))
}
