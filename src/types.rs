//! Bridge transaction types
//!
//! The records the checker evaluates, plus the values read back from the
//! destination-chain oracle and the source-chain node.

use alloy::primitives::{Address, Bytes, B256, U256};
use eyre::{eyre, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Chain ID
// ============================================================================

/// Numeric EVM chain ID (e.g. 1, 167000, 31337)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(pub u64);

impl ChainId {
    /// Get the raw numeric ID
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        ChainId(id)
    }
}

// ============================================================================
// Message Status
// ============================================================================

/// Lifecycle status of a bridge message, as reported by the destination bridge.
///
/// Encoded on the wire as the contract enum ordinal (0..=4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum MessageStatus {
    New,
    Retriable,
    Done,
    Failed,
    Recalled,
}

impl MessageStatus {
    /// Get the status as an uppercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStatus::New => "NEW",
            MessageStatus::Retriable => "RETRIABLE",
            MessageStatus::Done => "DONE",
            MessageStatus::Failed => "FAILED",
            MessageStatus::Recalled => "RECALLED",
        }
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<u8> for MessageStatus {
    type Error = eyre::Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(MessageStatus::New),
            1 => Ok(MessageStatus::Retriable),
            2 => Ok(MessageStatus::Done),
            3 => Ok(MessageStatus::Failed),
            4 => Ok(MessageStatus::Recalled),
            other => Err(eyre!("Unknown message status: {}", other)),
        }
    }
}

impl From<MessageStatus> for u8 {
    fn from(status: MessageStatus) -> Self {
        status as u8
    }
}

// ============================================================================
// Bridge Transaction
// ============================================================================

/// Receipt of the source-chain transaction that emitted the bridge message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeReceipt {
    /// Source-chain height the message was emitted at
    pub block_number: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_hash: Option<B256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<B256>,
}

/// Bridge message payload. Only its presence matters to the checker.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MessagePayload {
    pub id: u64,
    pub from: Address,
    pub src_chain_id: u64,
    pub dest_chain_id: u64,
    pub to: Address,
    pub value: U256,
    pub fee: U256,
    pub gas_limit: u64,
    pub data: Bytes,
    pub memo: String,
}

/// A bridge transaction as tracked by the caller's transaction history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeTransaction {
    /// Source transaction hash, used for diagnostics only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<B256>,
    pub status: MessageStatus,
    #[serde(default)]
    pub receipt: Option<BridgeReceipt>,
    #[serde(default)]
    pub message: Option<MessagePayload>,
    pub src_chain_id: ChainId,
    pub dest_chain_id: ChainId,
}

// ============================================================================
// Oracle and Source Chain Views
// ============================================================================

/// Destination chain's record of the latest source block it has synced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncCheckpoint {
    /// Oracle slot the checkpoint was read from
    pub slot: u64,
    /// Source-chain block ID as recorded by the oracle
    pub remote_block_id: u64,
    pub block_hash: B256,
    pub signal_root: B256,
}

impl SyncCheckpoint {
    /// The oracle has not recorded any source block yet
    pub fn is_empty(&self) -> bool {
        self.block_hash.is_zero()
    }
}

/// Block header resolved on the source chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceBlock {
    pub hash: B256,
    /// `None` when the node reports the block without a height
    pub number: Option<u64>,
}

/// Outcome of a block-by-hash lookup. "Not found" is an expected answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockLookup {
    Found(SourceBlock),
    NotFound,
}

impl BlockLookup {
    /// Height of the resolved block, if any
    pub fn height(&self) -> Option<u64> {
        match self {
            BlockLookup::Found(block) => block.number,
            BlockLookup::NotFound => None,
        }
    }
}
