//! Error types for the two chain reads

use std::time::Duration;

use alloy::primitives::Address;
use thiserror::Error;

use crate::types::ChainId;

/// Failure to read the sync checkpoint from the destination chain oracle
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("no routing entry for dest chain {dest} / src chain {src}")]
    MissingRoute { dest: ChainId, src: ChainId },

    #[error("no checkpoint reader configured for chain {0}")]
    MissingClient(ChainId),

    #[error("oracle {oracle} call failed: {message}")]
    Transport { oracle: Address, message: String },

    #[error("oracle {oracle} call reverted: {message}")]
    Reverted { oracle: Address, message: String },

    #[error("oracle {oracle} returned malformed data: {message}")]
    Decode { oracle: Address, message: String },

    #[error("oracle {oracle} call timed out after {timeout:?}")]
    Timeout { oracle: Address, timeout: Duration },
}

impl CheckpointError {
    /// Short label for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            CheckpointError::MissingRoute { .. } => "missing_route",
            CheckpointError::MissingClient(_) => "missing_client",
            CheckpointError::Transport { .. } => "transport",
            CheckpointError::Reverted { .. } => "reverted",
            CheckpointError::Decode { .. } => "decode",
            CheckpointError::Timeout { .. } => "timeout",
        }
    }

    /// Configuration problems, as opposed to runtime chain conditions
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            CheckpointError::MissingRoute { .. } | CheckpointError::MissingClient(_)
        )
    }
}

/// Failure to look a block up on the source chain.
///
/// An unknown hash is not an error; see [`crate::types::BlockLookup::NotFound`].
#[derive(Debug, Error)]
pub enum BlockLookupError {
    #[error("no block reader configured for chain {0}")]
    MissingClient(ChainId),

    #[error("block request failed: {0}")]
    Transport(String),

    #[error("RPC error: {code} - {message}")]
    Rpc { code: i64, message: String },

    #[error("malformed block response: {0}")]
    Decode(String),

    #[error("block request timed out")]
    Timeout,
}

impl From<reqwest::Error> for BlockLookupError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            BlockLookupError::Timeout
        } else if e.is_decode() {
            BlockLookupError::Decode(e.to_string())
        } else {
            BlockLookupError::Transport(e.to_string())
        }
    }
}
