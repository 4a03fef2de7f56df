//! Height comparator
//!
//! Resolves the checkpoint hash on the source chain and compares the height
//! against the receipt. Failures here are never surfaced: an unknown block or
//! an unreachable node both mean "not synced yet".

use alloy::primitives::B256;
use tracing::{debug, warn};

use crate::client::ChainClients;
use crate::types::{BlockLookup, ChainId};

/// How the receipt height relates to the synced source height
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// The synced height covers the receipt (`receipt_height <= height`)
    Synced { height: u64 },
    /// The synced height is below the receipt
    Behind { height: u64 },
    /// The source chain does not know the block, or reports it without a height
    Unresolved,
    /// The source chain could not be queried
    Unavailable,
}

impl SyncStatus {
    pub fn is_synced(&self) -> bool {
        matches!(self, SyncStatus::Synced { .. })
    }
}

/// Compares receipt heights against blocks resolved on the source chain
#[derive(Debug, Clone)]
pub struct HeightComparator {
    clients: ChainClients,
}

impl HeightComparator {
    pub fn new(clients: ChainClients) -> Self {
        Self { clients }
    }

    /// Whether the block `block_hash` on `src` is at or above `receipt_height`
    pub async fn is_synced(&self, src: ChainId, block_hash: B256, receipt_height: u64) -> bool {
        self.lookup(src, block_hash, receipt_height)
            .await
            .is_synced()
    }

    /// Resolve `block_hash` on `src` and classify it against `receipt_height`
    pub async fn lookup(&self, src: ChainId, block_hash: B256, receipt_height: u64) -> SyncStatus {
        let Some(reader) = self.clients.block_reader(src) else {
            warn!(
                src_chain_id = %src,
                "No block reader for source chain, check CHAIN_* configuration"
            );
            return SyncStatus::Unavailable;
        };

        let lookup = match reader.block_by_hash(block_hash).await {
            Ok(lookup) => lookup,
            Err(e) => {
                warn!(
                    error = %e,
                    src_chain_id = %src,
                    block_hash = %block_hash,
                    "Failed to resolve checkpoint block on source chain"
                );
                return SyncStatus::Unavailable;
            }
        };

        let height = match lookup {
            BlockLookup::Found(block) => block.number,
            BlockLookup::NotFound => None,
        };

        let Some(height) = height else {
            debug!(
                src_chain_id = %src,
                block_hash = %block_hash,
                found = matches!(lookup, BlockLookup::Found(_)),
                "Checkpoint block has no height on source chain"
            );
            return SyncStatus::Unresolved;
        };

        if receipt_height <= height {
            SyncStatus::Synced { height }
        } else {
            SyncStatus::Behind { height }
        }
    }
}
