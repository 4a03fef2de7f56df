//! Checkpoint resolver
//!
//! Reads the destination chain's record of the last source-chain block it has
//! synced. The result is a block hash, not a height; the comparator resolves
//! it against the source chain.

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::client::ChainClients;
use crate::error::CheckpointError;
use crate::routing::RoutingTable;
use crate::types::{ChainId, SyncCheckpoint};

/// Oracle slot holding the most recently synced snippet
pub const LATEST_SNIPPET_SLOT: u64 = 0;

/// Resolves the latest sync checkpoint for a route
#[derive(Debug, Clone)]
pub struct CheckpointResolver {
    routing: Arc<RoutingTable>,
    clients: ChainClients,
}

impl CheckpointResolver {
    pub fn new(routing: Arc<RoutingTable>, clients: ChainClients) -> Self {
        Self { routing, clients }
    }

    /// Read the latest checkpoint the destination chain holds for the source chain.
    ///
    /// No retry is attempted; every failure is returned to the caller.
    pub async fn resolve_checkpoint(
        &self,
        dest: ChainId,
        src: ChainId,
    ) -> Result<SyncCheckpoint, CheckpointError> {
        match self.read_latest(dest, src).await {
            Ok(checkpoint) => {
                debug!(
                    dest_chain_id = %dest,
                    src_chain_id = %src,
                    remote_block_id = checkpoint.remote_block_id,
                    block_hash = %checkpoint.block_hash,
                    "Resolved sync checkpoint"
                );
                Ok(checkpoint)
            }
            Err(e) if e.is_config_error() => {
                error!(
                    error = %e,
                    dest_chain_id = %dest,
                    src_chain_id = %src,
                    "Cannot read sync checkpoint, check ROUTE_* and CHAIN_* configuration"
                );
                Err(e)
            }
            Err(e) => {
                warn!(
                    error = %e,
                    dest_chain_id = %dest,
                    src_chain_id = %src,
                    "Failed to read sync checkpoint"
                );
                Err(e)
            }
        }
    }

    async fn read_latest(
        &self,
        dest: ChainId,
        src: ChainId,
    ) -> Result<SyncCheckpoint, CheckpointError> {
        let route = self
            .routing
            .lookup(dest, src)
            .ok_or(CheckpointError::MissingRoute { dest, src })?;
        let reader = self
            .clients
            .checkpoint_reader(dest)
            .ok_or(CheckpointError::MissingClient(dest))?;

        reader
            .synced_snippet(route.cross_chain_sync_address, LATEST_SNIPPET_SLOT)
            .await
    }
}
