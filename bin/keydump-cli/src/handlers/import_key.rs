//! Adds a private key to a wallet dump.

use anyhow::{Context, Result};
use keydump_backup::import_private_key;
use keydump_db::inmemory::KeyStoreInMemory;
use keydump_primitives::KeyId;

use crate::{
    cli::ImportKeyArgs,
    handlers::{load_into, write_dump},
    params::Params,
};

/// Handles the import-key command.
pub(crate) fn handle_import_key(args: ImportKeyArgs) -> Result<()> {
    let params = Params::from_args(&args.params)?;
    let key_id = import(&params, &args)?;

    println!("{key_id}");

    Ok(())
}

pub(crate) fn import(params: &Params, args: &ImportKeyArgs) -> Result<KeyId> {
    let chain = params.chain_view();
    let mut wallet = KeyStoreInMemory::new();
    load_into(&mut wallet, &chain, params, &args.input)?;

    let key_id = import_private_key(&mut wallet, &params.backup, &args.secret)
        .context("failed to import private key")?;

    write_dump(&wallet, &chain, params, &args.out)?;

    Ok(key_id)
}
