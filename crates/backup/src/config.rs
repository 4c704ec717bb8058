//! Backup configuration.

use bitcoin::Network;
use serde::{Deserialize, Serialize};

/// Producer string written into dumps unless configured otherwise.
pub const DEFAULT_PRODUCER: &str = concat!("keydump v", env!("CARGO_PKG_VERSION"));

/// The configuration of dump and restore operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackupConfig {
    /// Identifies the software that wrote a dump.
    producer: String,

    /// The network secret keys must be encoded for.
    network: Network,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            producer: DEFAULT_PRODUCER.to_string(),
            network: Network::Regtest,
        }
    }
}

impl BackupConfig {
    /// Sets the producer string.
    pub fn with_producer(self, producer: impl Into<String>) -> Self {
        Self {
            producer: producer.into(),
            ..self
        }
    }

    /// Sets the network.
    pub fn with_network(self, network: Network) -> Self {
        Self { network, ..self }
    }

    /// Returns the producer string.
    pub fn producer(&self) -> &str {
        &self.producer
    }

    /// Returns the network.
    pub const fn network(&self) -> Network {
        self.network
    }
}
