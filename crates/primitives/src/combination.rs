//! The key combination record: every key a wallet holds for one [`KeyId`](crate::KeyId).

use bitcoin::{NetworkKind, PrivateKey};
use secp256k1::SECP256K1;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::{
    dump_string::decode_dump_string,
    secret::{decode_secret, encode_secret},
};

/// Name of the creation timestamp inside [`KeyMetadata`].
pub const CREATED_AT_FIELD: &str = "created_at";

/// Name of the informational public key field.
pub const PUBKEY_FIELD: &str = "pubkey";

/// Name of the primary key field.
pub const PRIMARY_KEY_FIELD: &str = "primary_key";

/// Name of the miner key field.
pub const MINER_KEY_FIELD: &str = "miner_key";

/// Metadata stored next to the keys of one identity.
///
/// The wallet backup does not interpret any of it; every field is read and written back verbatim,
/// whatever its type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyMetadata(Map<String, Value>);

impl KeyMetadata {
    /// Unix timestamp of when the primary key was created, if recorded as an integer.
    pub fn created_at(&self) -> Option<i64> {
        self.0.get(CREATED_AT_FIELD).and_then(Value::as_i64)
    }

    /// Records the creation timestamp.
    pub fn set_created_at(&mut self, created_at: i64) {
        self.0.insert(CREATED_AT_FIELD.to_string(), Value::from(created_at));
    }

    /// Sets an arbitrary field.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.0.insert(name.into(), value);
    }

    /// All fields.
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for KeyMetadata {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// A primary signing key and an optional secondary "miner" key, each optional, plus metadata.
///
/// A record is only worth storing if it holds at least one key, see
/// [`KeyCombination::is_meaningful`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyCombination {
    primary: Option<PrivateKey>,
    miner: Option<PrivateKey>,
    metadata: KeyMetadata,
}

impl KeyCombination {
    /// Creates a new [`KeyCombination`] with empty metadata.
    pub fn new(primary: Option<PrivateKey>, miner: Option<PrivateKey>) -> Self {
        Self {
            primary,
            miner,
            metadata: KeyMetadata::default(),
        }
    }

    /// Creates a record holding only a primary key.
    pub fn from_primary(primary: PrivateKey) -> Self {
        Self::new(Some(primary), None)
    }

    /// Sets the primary key.
    pub fn with_primary(self, primary: PrivateKey) -> Self {
        Self {
            primary: Some(primary),
            ..self
        }
    }

    /// Sets the miner key.
    pub fn with_miner(self, miner: PrivateKey) -> Self {
        Self {
            miner: Some(miner),
            ..self
        }
    }

    /// Sets the creation timestamp.
    pub fn with_created_at(mut self, created_at: i64) -> Self {
        self.metadata.set_created_at(created_at);
        self
    }

    /// Replaces the metadata.
    pub fn with_metadata(self, metadata: KeyMetadata) -> Self {
        Self { metadata, ..self }
    }

    /// Returns the record with the miner role removed.
    pub fn without_miner(self) -> Self {
        Self {
            miner: None,
            ..self
        }
    }

    /// The primary signing key, if any.
    pub const fn primary(&self) -> Option<&PrivateKey> {
        self.primary.as_ref()
    }

    /// The miner key, if any.
    pub const fn miner(&self) -> Option<&PrivateKey> {
        self.miner.as_ref()
    }

    /// The metadata of this record.
    pub const fn metadata(&self) -> &KeyMetadata {
        &self.metadata
    }

    /// Whether the record holds a primary key.
    pub const fn has_primary(&self) -> bool {
        self.primary.is_some()
    }

    /// Whether the record holds a miner key.
    pub const fn has_miner(&self) -> bool {
        self.miner.is_some()
    }

    /// Whether the record holds a primary key, a miner key or both.
    ///
    /// Records for which this is `false` are neither stored, dumped nor restored.
    pub const fn is_meaningful(&self) -> bool {
        self.has_primary() || self.has_miner()
    }

    /// Serializes the record into its flat backup fields.
    pub fn to_fields(&self) -> KeyCombinationFields {
        KeyCombinationFields {
            pubkey: self
                .primary
                .map(|key| key.public_key(SECP256K1).to_string()),
            primary_key: self.primary.as_ref().map(encode_secret),
            miner_key: self.miner.as_ref().map(encode_secret),
            metadata: self.metadata.clone(),
        }
    }

    /// Rebuilds a record from its backup fields.
    ///
    /// A missing role stays absent. A role whose value is not a valid secret encoding for
    /// `network` is dropped with a warning, so the caller's acceptance check decides what happens
    /// to the rest of the record. Values may be percent-escaped.
    pub fn from_fields(fields: KeyCombinationFields, network: impl Into<NetworkKind>) -> Self {
        let network = network.into();
        let KeyCombinationFields {
            pubkey: _,
            primary_key,
            miner_key,
            metadata,
        } = fields;

        Self {
            primary: primary_key.and_then(|text| parse_role("primary", &text, network)),
            miner: miner_key.and_then(|text| parse_role("miner", &text, network)),
            metadata,
        }
    }
}

fn parse_role(role: &'static str, text: &str, network: NetworkKind) -> Option<PrivateKey> {
    match decode_secret(&decode_dump_string(text), network) {
        Ok(key) => Some(key),
        Err(err) => {
            warn!(%role, %err, "ignoring malformed key");
            None
        }
    }
}

/// The serialized form of a [`KeyCombination`], one element of a backup's key array.
///
/// Reading is lenient: a role or `pubkey` that is not a string is treated as absent, and every
/// other field lands in the metadata untouched. A field of an unexpected type therefore never
/// hides a key stored next to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeyCombinationFields {
    /// Hex public key of the primary key. Informational, ignored when reading.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pubkey: Option<String>,

    /// Primary key as WIF.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<String>,

    /// Miner key as WIF.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub miner_key: Option<String>,

    /// Pass-through metadata.
    #[serde(flatten)]
    pub metadata: KeyMetadata,
}

impl KeyCombinationFields {
    /// Splits a JSON object into the record fields, leniently.
    pub fn from_map(mut fields: Map<String, Value>) -> Self {
        let pubkey = take_text(&mut fields, PUBKEY_FIELD);
        let primary_key = take_text(&mut fields, PRIMARY_KEY_FIELD);
        let miner_key = take_text(&mut fields, MINER_KEY_FIELD);

        Self {
            pubkey,
            primary_key,
            miner_key,
            metadata: fields.into(),
        }
    }
}

impl<'de> Deserialize<'de> for KeyCombinationFields {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Map::deserialize(deserializer).map(Self::from_map)
    }
}

fn take_text(fields: &mut Map<String, Value>, name: &'static str) -> Option<String> {
    match fields.remove(name)? {
        Value::String(text) => Some(text),
        Value::Null => None,
        other => {
            warn!(field = %name, value = %other, "ignoring non-text field");
            None
        }
    }
}
