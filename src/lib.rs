//! Bridge Sync Checker
//!
//! Decides whether a bridge message emitted on a source chain can be processed
//! on its destination chain yet. The destination chain records the latest
//! source-chain block it has synced in a `CrossChainSync` oracle; a message is
//! processable once that block is at or above the height its receipt was
//! recorded at.
//!
//! - **Precondition** - short-circuits on missing data or an advanced status
//! - **Checkpoint** - reads the latest synced block hash from the destination chain
//! - **Comparator** - resolves that hash on the source chain and compares heights
//! - **Processable** - composes the three into a total `bool` decision
//!
//! ## Usage
//!
//! ```ignore
//! let config = Config::load()?;
//! let checker = ProcessableChecker::new(Arc::new(config.routing_table()), config.chain_clients()?);
//! if checker.is_processable(&tx).await {
//!     // claim on the destination chain
//! }
//! ```

pub mod checkpoint;
pub mod client;
pub mod comparator;
pub mod config;
pub mod contracts;
pub mod error;
pub mod metrics;
pub mod precondition;
pub mod processable;
pub mod routing;
pub mod types;

#[cfg(test)]
mod testing;

pub use checkpoint::{CheckpointResolver, LATEST_SNIPPET_SLOT};
pub use client::{BlockReader, ChainClients, CheckpointReader, EvmBlockReader, EvmCheckpointReader};
pub use comparator::{HeightComparator, SyncStatus};
pub use config::Config;
pub use error::{BlockLookupError, CheckpointError};
pub use processable::{ProcessableChecker, Verdict};
pub use routing::{RoutingContracts, RoutingTable};
pub use types::{
    BlockLookup, BridgeReceipt, BridgeTransaction, ChainId, MessagePayload, MessageStatus,
    SourceBlock, SyncCheckpoint,
};
