//! Routing table of per-route contract addresses
//!
//! Maps an ordered `(destination, source)` chain pair to the contracts that
//! serve that route on the destination chain. Built once at startup and
//! read-only afterwards.

use std::collections::HashMap;

use alloy::primitives::Address;

use crate::types::ChainId;

/// Contracts deployed on the destination chain for one route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutingContracts {
    /// Oracle recording the latest synced source-chain block
    pub cross_chain_sync_address: Address,
}

/// Lookup of routing contracts by `(dest, src)`
#[derive(Debug, Clone, Default)]
pub struct RoutingTable {
    routes: HashMap<(ChainId, ChainId), RoutingContracts>,
}

impl RoutingTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route. Returns the previous entry if the pair was already present.
    pub fn insert(
        &mut self,
        dest: ChainId,
        src: ChainId,
        contracts: RoutingContracts,
    ) -> Option<RoutingContracts> {
        self.routes.insert((dest, src), contracts)
    }

    /// Builder form of [`RoutingTable::insert`]
    pub fn with_route(mut self, dest: ChainId, src: ChainId, contracts: RoutingContracts) -> Self {
        self.insert(dest, src, contracts);
        self
    }

    /// Contracts for the route from `src` into `dest`
    pub fn lookup(&self, dest: ChainId, src: ChainId) -> Option<&RoutingContracts> {
        self.routes.get(&(dest, src))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
