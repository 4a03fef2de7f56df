//! Processability decision
//!
//! Composes the three steps in order, each able to end the evaluation early:
//!
//! 1. Precondition filter - missing data or a status past `New`
//! 2. Checkpoint resolver - latest synced source block hash on the destination chain
//! 3. Height comparator - resolve that hash on the source chain, compare heights
//!
//! Every failure degrades to "not processable".

use std::sync::Arc;

use futures::future::join_all;
use tracing::debug;

use crate::checkpoint::CheckpointResolver;
use crate::client::ChainClients;
use crate::comparator::{HeightComparator, SyncStatus};
use crate::metrics;
use crate::precondition::{self, Precondition};
use crate::routing::RoutingTable;
use crate::types::BridgeTransaction;

/// Outcome of an evaluation, with the reason behind it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Receipt or message payload is absent
    MissingData,
    /// Status is past `New`
    AlreadyAdvanced,
    /// The destination chain oracle could not be read
    OracleUnavailable,
    /// The oracle has not synced any source block yet
    NoCheckpoint,
    /// The checkpoint block is unknown to the source chain or has no height
    UnresolvedBlock,
    /// The source chain could not be queried
    SourceUnavailable,
    /// The destination chain has not synced up to the receipt yet
    NotYetSynced { receipt_height: u64, synced_height: u64 },
    /// The destination chain has synced past the receipt
    Synced { receipt_height: u64, synced_height: u64 },
}

impl Verdict {
    /// The boolean contract exposed to callers
    pub fn is_processable(&self) -> bool {
        matches!(self, Verdict::AlreadyAdvanced | Verdict::Synced { .. })
    }

    /// Short label for logs and metrics
    pub fn reason(&self) -> &'static str {
        match self {
            Verdict::MissingData => "missing_data",
            Verdict::AlreadyAdvanced => "already_advanced",
            Verdict::OracleUnavailable => "oracle_unavailable",
            Verdict::NoCheckpoint => "no_checkpoint",
            Verdict::UnresolvedBlock => "unresolved_block",
            Verdict::SourceUnavailable => "source_unavailable",
            Verdict::NotYetSynced { .. } => "not_yet_synced",
            Verdict::Synced { .. } => "synced",
        }
    }
}

/// Decides whether bridge transactions can be processed on their destination chain
#[derive(Debug, Clone)]
pub struct ProcessableChecker {
    resolver: CheckpointResolver,
    comparator: HeightComparator,
}

impl ProcessableChecker {
    /// Create a checker over a routing table and per-chain clients
    pub fn new(routing: Arc<RoutingTable>, clients: ChainClients) -> Self {
        Self {
            resolver: CheckpointResolver::new(routing, clients.clone()),
            comparator: HeightComparator::new(clients),
        }
    }

    /// Whether `tx` can be processed on its destination chain right now
    pub async fn is_processable(&self, tx: &BridgeTransaction) -> bool {
        self.evaluate(tx).await.is_processable()
    }

    /// Evaluate `tx` and report why
    pub async fn evaluate(&self, tx: &BridgeTransaction) -> Verdict {
        let verdict = match precondition::check(tx) {
            Precondition::Decided(verdict) => verdict,
            Precondition::Proceed { receipt_height } => {
                self.evaluate_against_chains(tx, receipt_height).await
            }
        };

        record(tx, &verdict);
        verdict
    }

    /// Evaluate independent transactions concurrently, in input order
    pub async fn evaluate_all(&self, txs: &[BridgeTransaction]) -> Vec<Verdict> {
        join_all(txs.iter().map(|tx| self.evaluate(tx))).await
    }

    async fn evaluate_against_chains(
        &self,
        tx: &BridgeTransaction,
        receipt_height: u64,
    ) -> Verdict {
        let dest = tx.dest_chain_id;
        let src = tx.src_chain_id;
        let dest_label = dest.to_string();
        let _timer = metrics::EVALUATION_LATENCY
            .with_label_values(&[dest_label.as_str()])
            .start_timer();

        let checkpoint = match self.resolver.resolve_checkpoint(dest, src).await {
            Ok(checkpoint) => checkpoint,
            Err(e) => {
                metrics::ORACLE_ERRORS
                    .with_label_values(&[dest_label.as_str(), e.kind()])
                    .inc();
                return Verdict::OracleUnavailable;
            }
        };

        if checkpoint.is_empty() {
            return Verdict::NoCheckpoint;
        }

        match self
            .comparator
            .lookup(src, checkpoint.block_hash, receipt_height)
            .await
        {
            SyncStatus::Synced { height } => Verdict::Synced {
                receipt_height,
                synced_height: height,
            },
            SyncStatus::Behind { height } => Verdict::NotYetSynced {
                receipt_height,
                synced_height: height,
            },
            SyncStatus::Unresolved => Verdict::UnresolvedBlock,
            SyncStatus::Unavailable => Verdict::SourceUnavailable,
        }
    }
}

fn record(tx: &BridgeTransaction, verdict: &Verdict) {
    let src = tx.src_chain_id.to_string();
    let dest = tx.dest_chain_id.to_string();
    let processable = verdict.is_processable();

    metrics::DECISIONS
        .with_label_values(&[
            src.as_str(),
            dest.as_str(),
            verdict.reason(),
            if processable { "true" } else { "false" },
        ])
        .inc();

    debug!(
        tx_hash = ?tx.hash,
        status = %tx.status,
        src_chain_id = %src,
        dest_chain_id = %dest,
        reason = verdict.reason(),
        processable,
        "Evaluated bridge transaction"
    );
}
