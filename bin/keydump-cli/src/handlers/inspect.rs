//! Summarizes a wallet dump without writing anything.

use anyhow::{Context, Result};
use keydump_backup::restore::{import_entries, read_document};
use keydump_db::inmemory::KeyStoreInMemory;
use serde::Serialize;

use crate::{cli::InspectArgs, params::Params};

#[derive(Debug, Serialize)]
pub(crate) struct Summary {
    created_by: Option<String>,
    created_at: Option<String>,
    best_block_height: Option<u64>,
    best_block_hash: Option<String>,
    entries: usize,
    imported: usize,
    skipped: usize,
    primary_keys: usize,
    miner_keys: usize,
}

/// Handles the inspect command.
pub(crate) fn handle_inspect(args: InspectArgs) -> Result<()> {
    let params = Params::from_args(&args.params)?;
    let summary = summarize(&params, &args)?;

    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}

pub(crate) fn summarize(params: &Params, args: &InspectArgs) -> Result<Summary> {
    params.check_document_size(&args.input)?;
    let document = read_document(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    let mut scratch = KeyStoreInMemory::new();
    let stats = import_entries(&mut scratch, &params.backup, &document.entries);

    let provenance = document.provenance;
    Ok(Summary {
        created_by: provenance.created_by,
        created_at: provenance.created_at,
        best_block_height: provenance.best_block_height,
        best_block_hash: provenance.best_block_hash,
        entries: document.entries.len(),
        imported: stats.imported,
        skipped: stats.skipped,
        primary_keys: scratch.records().filter(|(_, r)| r.has_primary()).count(),
        miner_keys: scratch.records().filter(|(_, r)| r.has_miner()).count(),
    })
}
