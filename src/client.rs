//! Chain clients used by the checker
//!
//! Two read-only collaborators, each bound to a single chain:
//!
//! - [`CheckpointReader`] - reads the sync oracle on the destination chain
//! - [`BlockReader`] - resolves a block by hash on the source chain
//!
//! The EVM implementations bound every request by a timeout so an unresponsive
//! node cannot stall an evaluation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use alloy::{
    primitives::{Address, B256},
    providers::{ProviderBuilder, RootProvider},
    transports::http::{Client, Http},
};
use async_trait::async_trait;
use eyre::{eyre, Result};
use serde::Deserialize;
use tracing::info;

use crate::contracts::CrossChainSync;
use crate::error::{BlockLookupError, CheckpointError};
use crate::types::{BlockLookup, ChainId, SourceBlock, SyncCheckpoint};

// ============================================================================
// Collaborator Traits
// ============================================================================

/// Reads sync checkpoints from an oracle contract on one chain
#[async_trait]
pub trait CheckpointReader: Send + Sync {
    /// Read the synced snippet stored at `slot` of the oracle at `oracle`
    async fn synced_snippet(
        &self,
        oracle: Address,
        slot: u64,
    ) -> Result<SyncCheckpoint, CheckpointError>;
}

/// Resolves blocks by hash on one chain
#[async_trait]
pub trait BlockReader: Send + Sync {
    /// Look up a block by hash. An unknown hash yields `Ok(BlockLookup::NotFound)`.
    async fn block_by_hash(&self, hash: B256) -> Result<BlockLookup, BlockLookupError>;
}

// ============================================================================
// EVM Checkpoint Reader
// ============================================================================

/// Reads `getSyncedSnippet` through an alloy HTTP provider
pub struct EvmCheckpointReader {
    provider: RootProvider<Http<Client>>,
    timeout: Duration,
}

impl EvmCheckpointReader {
    /// Create a reader for the chain served at `rpc_url`
    pub fn new(rpc_url: &str, chain_id: ChainId, timeout: Duration) -> Result<Self> {
        let provider = ProviderBuilder::new().on_http(
            rpc_url
                .parse()
                .map_err(|e| eyre!("Invalid RPC URL: {}", e))?,
        );

        info!(
            rpc_url = %rpc_url,
            chain_id = %chain_id,
            timeout_ms = timeout.as_millis() as u64,
            "Created checkpoint reader"
        );

        Ok(Self { provider, timeout })
    }
}

#[async_trait]
impl CheckpointReader for EvmCheckpointReader {
    async fn synced_snippet(
        &self,
        oracle: Address,
        slot: u64,
    ) -> Result<SyncCheckpoint, CheckpointError> {
        let contract = CrossChainSync::new(oracle, &self.provider);
        let call = contract.getSyncedSnippet(slot);

        let result = tokio::time::timeout(self.timeout, call.call())
            .await
            .map_err(|_| CheckpointError::Timeout {
                oracle,
                timeout: self.timeout,
            })?
            .map_err(|e| classify_call_error(oracle, e))?;

        let snippet = result.snippet;
        Ok(SyncCheckpoint {
            slot,
            remote_block_id: snippet.remoteBlockId,
            block_hash: snippet.blockHash,
            signal_root: snippet.signalRoot,
        })
    }
}

/// Split contract call failures into revert, transport and decode errors
fn classify_call_error(oracle: Address, e: alloy::contract::Error) -> CheckpointError {
    match e {
        alloy::contract::Error::TransportError(err) => {
            if err.as_error_resp().is_some() {
                CheckpointError::Reverted {
                    oracle,
                    message: err.to_string(),
                }
            } else {
                CheckpointError::Transport {
                    oracle,
                    message: err.to_string(),
                }
            }
        }
        other => CheckpointError::Decode {
            oracle,
            message: other.to_string(),
        },
    }
}

// ============================================================================
// EVM Block Reader
// ============================================================================

/// JSON-RPC response wrapper
#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

/// JSON-RPC error
#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

/// The subset of `eth_getBlockByHash` the checker needs
#[derive(Debug, Deserialize)]
struct RpcBlockHeader {
    hash: Option<B256>,
    number: Option<String>,
}

/// Resolves blocks with raw `eth_getBlockByHash` calls.
///
/// Raw JSON-RPC keeps a `null` block number representable, which typed
/// block headers cannot express.
pub struct EvmBlockReader {
    client: reqwest::Client,
    rpc_url: String,
}

impl EvmBlockReader {
    /// Create a reader for the chain served at `rpc_url`
    pub fn new(rpc_url: &str, chain_id: ChainId, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        info!(
            rpc_url = %rpc_url,
            chain_id = %chain_id,
            timeout_ms = timeout.as_millis() as u64,
            "Created block reader"
        );

        Ok(Self {
            client,
            rpc_url: rpc_url.to_string(),
        })
    }
}

#[async_trait]
impl BlockReader for EvmBlockReader {
    async fn block_by_hash(&self, hash: B256) -> Result<BlockLookup, BlockLookupError> {
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "method": "eth_getBlockByHash",
            "params": [hash, false],
            "id": 1
        });

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<serde_json::Value>()
            .await?;

        parse_block_response(hash, response)
    }
}

/// Interpret an `eth_getBlockByHash` response body
fn parse_block_response(
    requested: B256,
    body: serde_json::Value,
) -> Result<BlockLookup, BlockLookupError> {
    if body.get("result").is_none() && body.get("error").is_none() {
        return Err(BlockLookupError::Decode(
            "response has neither result nor error".to_string(),
        ));
    }

    let response: RpcResponse<RpcBlockHeader> =
        serde_json::from_value(body).map_err(|e| BlockLookupError::Decode(e.to_string()))?;

    if let Some(error) = response.error {
        return Err(BlockLookupError::Rpc {
            code: error.code,
            message: error.message,
        });
    }

    let Some(header) = response.result else {
        return Ok(BlockLookup::NotFound);
    };

    let number = header
        .number
        .as_deref()
        .map(parse_quantity)
        .transpose()?;

    Ok(BlockLookup::Found(SourceBlock {
        hash: header.hash.unwrap_or(requested),
        number,
    }))
}

/// Parse a hex-encoded JSON-RPC quantity (e.g. "0x1b4")
fn parse_quantity(raw: &str) -> Result<u64, BlockLookupError> {
    let digits = raw
        .strip_prefix("0x")
        .ok_or_else(|| BlockLookupError::Decode(format!("quantity without 0x prefix: {}", raw)))?;
    u64::from_str_radix(digits, 16)
        .map_err(|e| BlockLookupError::Decode(format!("invalid quantity {}: {}", raw, e)))
}

// ============================================================================
// Per-Chain Registry
// ============================================================================

/// Client handles keyed by chain ID
#[derive(Clone, Default)]
pub struct ChainClients {
    checkpoint_readers: HashMap<ChainId, Arc<dyn CheckpointReader>>,
    block_readers: HashMap<ChainId, Arc<dyn BlockReader>>,
}

impl ChainClients {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the checkpoint reader for a destination chain
    pub fn with_checkpoint_reader(
        mut self,
        chain_id: ChainId,
        reader: Arc<dyn CheckpointReader>,
    ) -> Self {
        self.checkpoint_readers.insert(chain_id, reader);
        self
    }

    /// Register the block reader for a source chain
    pub fn with_block_reader(mut self, chain_id: ChainId, reader: Arc<dyn BlockReader>) -> Self {
        self.block_readers.insert(chain_id, reader);
        self
    }

    /// Register EVM readers for a chain in both roles
    pub fn with_evm_chain(self, chain_id: ChainId, rpc_url: &str, timeout: Duration) -> Result<Self> {
        let checkpoint = EvmCheckpointReader::new(rpc_url, chain_id, timeout)?;
        let block = EvmBlockReader::new(rpc_url, chain_id, timeout)?;
        Ok(self
            .with_checkpoint_reader(chain_id, Arc::new(checkpoint))
            .with_block_reader(chain_id, Arc::new(block)))
    }

    pub fn checkpoint_reader(&self, chain_id: ChainId) -> Option<Arc<dyn CheckpointReader>> {
        self.checkpoint_readers.get(&chain_id).cloned()
    }

    pub fn block_reader(&self, chain_id: ChainId) -> Option<Arc<dyn BlockReader>> {
        self.block_readers.get(&chain_id).cloned()
    }
}

impl std::fmt::Debug for ChainClients {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut checkpoint_chains: Vec<_> = self.checkpoint_readers.keys().collect();
        checkpoint_chains.sort();
        let mut block_chains: Vec<_> = self.block_readers.keys().collect();
        block_chains.sort();
        f.debug_struct("ChainClients")
            .field("checkpoint_readers", &checkpoint_chains)
            .field("block_readers", &block_chains)
            .finish()
    }
}
