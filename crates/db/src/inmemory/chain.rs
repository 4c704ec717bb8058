//! A chain view that does not follow any chain.

use std::collections::BTreeSet;

use bitcoin::{blockdata::constants::genesis_block, BlockHash, Network};
use keydump_primitives::KeyId;

use crate::chain::{ChainMarker, ChainView};

/// Which identities a [`StaticChainView`] reports as registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// Every identity is registered.
    All,

    /// Only the listed identities are registered.
    Only(BTreeSet<KeyId>),
}

impl Default for Registration {
    fn default() -> Self {
        Self::Only(BTreeSet::new())
    }
}

/// A [`ChainView`] with a fixed tip, for tests and offline tooling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticChainView {
    genesis: ChainMarker,
    tip: ChainMarker,
    registration: Registration,
}

impl StaticChainView {
    /// Creates a view of `network` whose tip is the genesis block and where nothing is
    /// registered.
    pub fn new(network: Network) -> Self {
        let genesis = ChainMarker {
            height: 0,
            hash: genesis_block(network).block_hash(),
        };

        Self {
            genesis,
            tip: genesis,
            registration: Registration::default(),
        }
    }

    /// Moves the tip.
    pub fn with_tip(self, height: u64, hash: BlockHash) -> Self {
        Self {
            tip: ChainMarker { height, hash },
            ..self
        }
    }

    /// Sets which identities are registered.
    pub fn with_registration(self, registration: Registration) -> Self {
        Self {
            registration,
            ..self
        }
    }

    /// Registers one more identity.
    pub fn register(&mut self, key_id: KeyId) {
        match &mut self.registration {
            Registration::All => {}
            Registration::Only(ids) => {
                ids.insert(key_id);
            }
        }
    }
}

impl ChainView for StaticChainView {
    fn best_height(&self) -> u64 {
        self.tip.height
    }

    fn best_hash(&self) -> BlockHash {
        self.tip.hash
    }

    fn genesis_marker(&self) -> ChainMarker {
        self.genesis
    }

    fn is_registered(&self, key_id: &KeyId) -> bool {
        match &self.registration {
            Registration::All => true,
            Registration::Only(ids) => ids.contains(key_id),
        }
    }
}
