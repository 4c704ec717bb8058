use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "keydump-cli",
    about = "Inspect, merge and rewrite wallet dump files",
    version
)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub(crate) enum Commands {
    Inspect(InspectArgs),

    Merge(MergeArgs),

    StripMinerKeys(StripMinerKeysArgs),

    DecodeString(DecodeStringArgs),

    ImportKey(ImportKeyArgs),
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Summarize the records of a wallet dump", version)]
pub(crate) struct InspectArgs {
    #[arg(help = "the wallet dump to inspect")]
    pub(crate) input: PathBuf,

    #[clap(flatten)]
    pub(crate) params: ParamsArgs,
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Combine several wallet dumps into one", version)]
pub(crate) struct MergeArgs {
    #[arg(
        required = true,
        help = "the wallet dumps to merge, later files win on conflicts"
    )]
    pub(crate) inputs: Vec<PathBuf>,

    #[arg(long, help = "where to write the merged dump")]
    pub(crate) out: PathBuf,

    #[clap(flatten)]
    pub(crate) params: ParamsArgs,
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Write a copy of a wallet dump without its miner keys", version)]
pub(crate) struct StripMinerKeysArgs {
    #[arg(help = "the wallet dump to strip")]
    pub(crate) input: PathBuf,

    #[arg(long, help = "where to write the stripped dump")]
    pub(crate) out: PathBuf,

    #[clap(flatten)]
    pub(crate) params: ParamsArgs,
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Decode a percent-escaped string from a legacy dump", version)]
pub(crate) struct DecodeStringArgs {
    #[arg(help = "the escaped text")]
    pub(crate) text: String,
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Add a private key to a wallet dump", version)]
pub(crate) struct ImportKeyArgs {
    #[arg(help = "the wallet dump to add the key to")]
    pub(crate) input: PathBuf,

    #[arg(long, env = "KEYDUMP_SECRET", help = "the private key, WIF encoded")]
    pub(crate) secret: String,

    #[arg(long, help = "where to write the resulting dump")]
    pub(crate) out: PathBuf,

    #[clap(flatten)]
    pub(crate) params: ParamsArgs,
}

#[derive(Parser, Debug, Clone)]
pub(crate) struct ParamsArgs {
    #[arg(
        long = "params",
        env = "KEYDUMP_PARAMS",
        help = "the path to the params file, defaults apply if omitted"
    )]
    pub(crate) path: Option<PathBuf>,
}
