use std::{fs, path::Path};

use anyhow::{anyhow, bail};
use bitcoin::{blockdata::constants::genesis_block, BlockHash};
use keydump_backup::BackupConfig;
use keydump_db::inmemory::StaticChainView;
use serde::{Deserialize, Serialize};

use crate::cli::ParamsArgs;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Params {
    pub(crate) backup: BackupConfig,
    pub(crate) chain: ChainParams,

    /// Dumps larger than this are refused before being read.
    pub(crate) max_document_bytes: Option<u64>,
}

/// The chain tip recorded in dumps written by the CLI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct ChainParams {
    pub(crate) best_height: u64,

    /// Genesis hash of the configured network if unset.
    pub(crate) best_hash: Option<BlockHash>,
}

impl Params {
    pub(crate) fn from_path(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let contents = fs::read_to_string(path)?;
        let params: Self = toml::from_str(&contents)
            .map_err(|e| anyhow!(format!("Failed to parse params file: {}", e)))?;

        Ok(params)
    }

    pub(crate) fn from_args(args: &ParamsArgs) -> Result<Self, anyhow::Error> {
        match &args.path {
            Some(path) => Self::from_path(path),
            None => Ok(Self::default()),
        }
    }

    pub(crate) fn chain_view(&self) -> StaticChainView {
        let network = self.backup.network();
        let best_hash = self
            .chain
            .best_hash
            .unwrap_or_else(|| genesis_block(network).block_hash());

        StaticChainView::new(network).with_tip(self.chain.best_height, best_hash)
    }

    /// Fails if the file at `path` is larger than `max_document_bytes`.
    pub(crate) fn check_document_size(&self, path: &Path) -> Result<(), anyhow::Error> {
        let Some(max) = self.max_document_bytes else {
            return Ok(());
        };

        let len = fs::metadata(path)
            .map_err(|e| anyhow!("cannot access {}: {e}", path.display()))?
            .len();
        if len > max {
            bail!(
                "{} is {len} bytes, larger than the configured maximum of {max} bytes",
                path.display()
            );
        }

        Ok(())
    }
}
