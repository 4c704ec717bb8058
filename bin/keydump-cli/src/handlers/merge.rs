//! Combines several wallet dumps into one.

use anyhow::Result;
use keydump_db::inmemory::KeyStoreInMemory;
use tracing::info;

use crate::{
    cli::MergeArgs,
    handlers::{load_into, write_dump},
    params::Params,
};

/// Handles the merge command.
pub(crate) fn handle_merge(args: MergeArgs) -> Result<()> {
    let params = Params::from_args(&args.params)?;
    let written = merge(&params, &args)?;

    println!("{written}");

    Ok(())
}

pub(crate) fn merge(params: &Params, args: &MergeArgs) -> Result<usize> {
    let chain = params.chain_view();
    let mut wallet = KeyStoreInMemory::new();

    for input in &args.inputs {
        let imported = load_into(&mut wallet, &chain, params, input)?;
        info!(path = %input.display(), imported, "merged wallet dump");
    }

    write_dump(&wallet, &chain, params, &args.out)
}
