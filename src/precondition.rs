//! Precondition filter
//!
//! Decides without any network access when the transaction either lacks the
//! data needed for a decision or its status already implies one.

use crate::processable::Verdict;
use crate::types::{BridgeTransaction, MessageStatus};

/// Result of the precondition check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// The decision is already known
    Decided(Verdict),
    /// The chains must be consulted, comparing against `receipt_height`
    Proceed { receipt_height: u64 },
}

/// Check a transaction before any chain is queried.
///
/// A missing receipt or payload can never be proven synced. Any status past
/// `New` is treated as already processable.
pub fn check(tx: &BridgeTransaction) -> Precondition {
    let receipt = match (&tx.receipt, &tx.message) {
        (Some(receipt), Some(_)) => receipt,
        _ => return Precondition::Decided(Verdict::MissingData),
    };

    if tx.status != MessageStatus::New {
        return Precondition::Decided(Verdict::AlreadyAdvanced);
    }

    Precondition::Proceed {
        receipt_height: receipt.block_number,
    }
}
