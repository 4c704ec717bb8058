//! The wallet's view of the best chain.

use bitcoin::BlockHash;
use keydump_primitives::KeyId;

/// A block on the best chain, used as the starting point of a rescan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainMarker {
    /// Height of the block.
    pub height: u64,

    /// Hash of the block.
    pub hash: BlockHash,
}

/// Read access to the chain state the wallet follows.
///
/// Implementations are borrowed for the duration of one backup operation. Holding the borrow is
/// what keeps a restore's rescan from racing a reorganization applied through the same view.
pub trait ChainView {
    /// Height of the best block.
    fn best_height(&self) -> u64;

    /// Hash of the best block.
    fn best_hash(&self) -> BlockHash;

    /// The first block of the chain, where full rescans start.
    fn genesis_marker(&self) -> ChainMarker;

    /// Whether `key_id` is registered on chain, i.e. whether its miner key can be used for
    /// delegated mining.
    fn is_registered(&self, key_id: &KeyId) -> bool;
}
