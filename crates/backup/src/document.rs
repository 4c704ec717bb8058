//! The wallet dump document.
//!
//! A dump is a single JSON object:
//!
//! ```json
//! {
//!   "created_by": "keydump v0.1.0",
//!   "created_at": "2024-05-01T12:00:00Z",
//!   "best_block_height": 1200,
//!   "best_block_hash": "0f9188f1...",
//!   "key": [
//!     { "keyid": "89abcdef...", "pubkey": "02...", "primary_key": "cV...", "created_at": 1714564800 }
//!   ]
//! }
//! ```
//!
//! The provenance fields are informational and never validated on import.

use keydump_primitives::{dump_string::decode_dump_string, KeyCombinationFields, KeyId};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::EntryError;

/// Name of the key array.
pub const KEYS_FIELD: &str = "key";

/// Name of the identity field of every entry.
pub const KEY_ID_FIELD: &str = "keyid";

/// `strftime` format of [`BackupDocument::created_at`].
pub const DUMP_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// A dump as written to disk.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackupDocument {
    /// The software that wrote the dump.
    pub created_by: String,

    /// UTC time of the dump, formatted with [`DUMP_TIME_FORMAT`].
    pub created_at: String,

    /// Height of the best block at dump time.
    pub best_block_height: u64,

    /// Hex hash of the best block at dump time.
    pub best_block_hash: String,

    /// One entry per meaningful record.
    pub key: Vec<BackupEntry>,
}

/// One element of the key array.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackupEntry {
    /// Identity of the record.
    pub keyid: KeyId,

    /// The record itself.
    #[serde(flatten)]
    pub fields: KeyCombinationFields,
}

/// Provenance of a dump read back from disk; any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Provenance {
    /// The software that wrote the dump.
    pub created_by: Option<String>,

    /// Time of the dump.
    pub created_at: Option<String>,

    /// Height of the best block at dump time.
    pub best_block_height: Option<u64>,

    /// Hash of the best block at dump time.
    pub best_block_hash: Option<String>,
}

/// A dump read back from disk.
///
/// Only the top-level shape is validated here; entries are parsed one at a time with
/// [`parse_entry`] so that a broken entry does not take the others down with it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    /// Provenance of the dump.
    pub provenance: Provenance,

    /// The raw entries of the key array.
    pub entries: Vec<Value>,
}

impl ParsedDocument {
    /// Parses the top level of a dump.
    ///
    /// Fails with a human-readable reason if `text` is not JSON, not an object, or has no key
    /// array.
    pub fn from_json(text: &str) -> Result<Self, String> {
        let value: Value = serde_json::from_str(text).map_err(|err| err.to_string())?;
        let Value::Object(mut object) = value else {
            return Err("expected a JSON object".to_string());
        };

        let entries = match object.remove(KEYS_FIELD) {
            Some(Value::Array(entries)) => entries,
            Some(_) => return Err(format!("`{KEYS_FIELD}` is not an array")),
            None => return Err(format!("missing `{KEYS_FIELD}` array")),
        };

        let text_field = |name: &str| object.get(name).and_then(Value::as_str).map(str::to_owned);
        let provenance = Provenance {
            created_by: text_field("created_by"),
            created_at: text_field("created_at"),
            best_block_height: object.get("best_block_height").and_then(Value::as_u64),
            best_block_hash: text_field("best_block_hash"),
        };

        Ok(Self {
            provenance,
            entries,
        })
    }
}

/// Splits one raw entry into its identity and its record fields.
///
/// The identity may be percent-escaped. An entry without an identity, or with a `null` one, is
/// rejected. Everything else is read field by field, see [`KeyCombinationFields::from_map`].
pub fn parse_entry(entry: &Value) -> Result<(KeyId, KeyCombinationFields), EntryError> {
    let object = entry.as_object().ok_or(EntryError::NotAnObject)?;

    let key_id: KeyId = match object.get(KEY_ID_FIELD) {
        None | Some(Value::Null) => return Err(EntryError::MissingKeyId),
        Some(Value::String(text)) => decode_dump_string(text).parse()?,
        Some(_) => return Err(EntryError::KeyIdNotText),
    };

    let rest: Map<String, Value> = object
        .iter()
        .filter(|(name, _)| name.as_str() != KEY_ID_FIELD)
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();

    Ok((key_id, KeyCombinationFields::from_map(rest)))
}
