//! CLI for inspecting and rewriting wallet dumps offline.

mod handlers;
mod params;

use anyhow::{Error, Result};
use clap::Parser;
use keydump_common::logging::{self, LoggerConfig};

use crate::handlers::{decode_string, import_key, inspect, merge, strip_miner};

mod cli;

fn main() -> Result<(), Error> {
    logging::init(LoggerConfig::with_base_name("keydump-cli"));

    let cli = cli::Cli::parse();
    match cli.command {
        cli::Commands::Inspect(args) => inspect::handle_inspect(args),
        cli::Commands::Merge(args) => merge::handle_merge(args),
        cli::Commands::StripMinerKeys(args) => strip_miner::handle_strip_miner_keys(args),
        cli::Commands::DecodeString(args) => decode_string::handle_decode_string(args),
        cli::Commands::ImportKey(args) => import_key::handle_import_key(args),
    }
}
