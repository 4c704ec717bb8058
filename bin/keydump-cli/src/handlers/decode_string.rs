//! Decodes one percent-escaped string from a legacy dump.

use anyhow::Result;
use keydump_primitives::dump_string::decode_dump_string;

use crate::cli::DecodeStringArgs;

/// Handles the decode-string command.
pub(crate) fn handle_decode_string(args: DecodeStringArgs) -> Result<()> {
    println!("{}", decode_dump_string(&args.text));

    Ok(())
}
