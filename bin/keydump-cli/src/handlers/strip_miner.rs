//! Writes a copy of a wallet dump without its miner keys.

use anyhow::{Context, Result};
use keydump_backup::{clear_all_secondary_mining_keys, errors::BackupError};
use keydump_db::inmemory::{KeyStoreInMemory, Registration};
use tracing::warn;

use crate::{
    cli::StripMinerKeysArgs,
    handlers::{load_into, write_dump},
    params::Params,
};

/// Handles the strip-miner-keys command.
pub(crate) fn handle_strip_miner_keys(args: StripMinerKeysArgs) -> Result<()> {
    let params = Params::from_args(&args.params)?;
    let cleared = strip(&params, &args)?;

    println!("{cleared}");

    Ok(())
}

/// Returns the number of records that lost their miner key.
pub(crate) fn strip(params: &Params, args: &StripMinerKeysArgs) -> Result<usize> {
    // a dump carries no registration data, every identity counts as registered
    let chain = params.chain_view().with_registration(Registration::All);
    let mut wallet = KeyStoreInMemory::new();
    load_into(&mut wallet, &chain, params, &args.input)?;

    let cleared = match clear_all_secondary_mining_keys(&mut wallet, &chain) {
        Ok(cleared) => cleared,
        Err(BackupError::PreconditionFailed(reason)) => {
            warn!(%reason, "nothing to strip");
            0
        }
        Err(err) => return Err(err).context("failed to clear miner keys"),
    };

    write_dump(&wallet, &chain, params, &args.out)?;

    Ok(cleared)
}
