//! Checker configuration
//!
//! # Environment Variable Schema
//!
//! ```text
//! CHAINS_COUNT=2                          # Number of chains to configure
//! CHAIN_1_NAME=l1                         # optional, default chain_1
//! CHAIN_1_CHAIN_ID=31336                  # Native EVM chain ID
//! CHAIN_1_RPC_URL=http://localhost:8545
//! ROUTES_COUNT=1                          # Number of (dest, src) routes
//! ROUTE_1_SRC_CHAIN_ID=31336
//! ROUTE_1_DEST_CHAIN_ID=167001
//! ROUTE_1_CROSS_CHAIN_SYNC_ADDRESS=0x...  # Oracle on the destination chain
//! RPC_TIMEOUT_MS=10000                    # optional, per-request bound
//! ```

use std::collections::HashSet;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use alloy::primitives::Address;
use eyre::{eyre, Result, WrapErr};

use crate::client::ChainClients;
use crate::routing::{RoutingContracts, RoutingTable};
use crate::types::ChainId;

/// Default bound on a single RPC request
pub const DEFAULT_RPC_TIMEOUT_MS: u64 = 10_000;

// ============================================================================
// Validation Helpers
// ============================================================================

/// Check that an RPC endpoint is an http(s) URL with a host.
///
/// Plain http to a non-loopback host is accepted with a warning.
pub fn validate_rpc_url(url_str: &str, name: &str) -> Result<()> {
    let parsed =
        url::Url::parse(url_str).map_err(|e| eyre!("{} is not a valid URL: {}", name, e))?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(eyre!(
            "{} must use http:// or https:// scheme, got {}",
            name,
            scheme
        ));
    }

    let Some(host) = parsed.host_str() else {
        return Err(eyre!("{} has no host", name));
    };

    let loopback = host == "localhost" || host == "127.0.0.1" || host == "[::1]";
    if scheme == "http" && !loopback {
        tracing::warn!(
            endpoint = name,
            host = host,
            "RPC endpoint is plain http, chain reads are not authenticated in transit"
        );
    }

    Ok(())
}

/// Parse a 0x-prefixed 42-char hex contract address
pub fn parse_contract_address(raw: &str, name: &str) -> Result<Address> {
    if raw.len() != 42 || !raw.starts_with("0x") {
        return Err(eyre!(
            "Invalid {}: {} (expected 0x-prefixed 42-char hex)",
            name,
            raw
        ));
    }
    Address::from_str(raw).wrap_err_with(|| format!("Invalid {}: {}", name, raw))
}

// ============================================================================
// Chain and Route Configuration
// ============================================================================

/// An RPC endpoint for one chain
#[derive(Debug, Clone)]
pub struct ChainConfig {
    /// Human-readable name (e.g., "l1", "l2")
    pub name: String,
    pub chain_id: ChainId,
    pub rpc_url: String,
}

/// Contracts serving messages from `src_chain_id` into `dest_chain_id`
#[derive(Debug, Clone)]
pub struct RouteConfig {
    pub src_chain_id: ChainId,
    pub dest_chain_id: ChainId,
    /// Sync oracle on the destination chain
    pub cross_chain_sync_address: Address,
}

/// Checker configuration
#[derive(Debug, Clone)]
pub struct Config {
    chains: Vec<ChainConfig>,
    routes: Vec<RouteConfig>,
    rpc_timeout: Duration,
}

impl Config {
    /// Create a validated configuration
    pub fn new(chains: Vec<ChainConfig>, routes: Vec<RouteConfig>, rpc_timeout: Duration) -> Result<Self> {
        let config = Self {
            chains,
            routes,
            rpc_timeout,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment
    pub fn load() -> Result<Self> {
        // Try to load .env file
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded .env from {:?}", path);
        }

        let chains = load_chains_from_env()?;
        let routes = load_routes_from_env()?;

        let rpc_timeout_ms = match env::var("RPC_TIMEOUT_MS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| eyre!("Invalid RPC_TIMEOUT_MS {:?}, expected milliseconds", raw))?,
            Err(_) => DEFAULT_RPC_TIMEOUT_MS,
        };

        Self::new(chains, routes, Duration::from_millis(rpc_timeout_ms))
    }

    pub fn chains(&self) -> &[ChainConfig] {
        &self.chains
    }

    pub fn routes(&self) -> &[RouteConfig] {
        &self.routes
    }

    pub fn rpc_timeout(&self) -> Duration {
        self.rpc_timeout
    }

    /// Get chain config by chain ID
    pub fn get_chain(&self, chain_id: ChainId) -> Option<&ChainConfig> {
        self.chains.iter().find(|c| c.chain_id == chain_id)
    }

    /// Build the routing table from the configured routes
    pub fn routing_table(&self) -> RoutingTable {
        let mut table = RoutingTable::new();
        for route in &self.routes {
            table.insert(
                route.dest_chain_id,
                route.src_chain_id,
                RoutingContracts {
                    cross_chain_sync_address: route.cross_chain_sync_address,
                },
            );
        }
        table
    }

    /// Build EVM readers for every configured chain
    pub fn chain_clients(&self) -> Result<ChainClients> {
        let mut clients = ChainClients::new();
        for chain in &self.chains {
            clients = clients
                .with_evm_chain(chain.chain_id, &chain.rpc_url, self.rpc_timeout)
                .wrap_err_with(|| format!("Failed to create clients for chain {}", chain.name))?;
        }
        Ok(clients)
    }

    fn validate(&self) -> Result<()> {
        if self.chains.is_empty() {
            return Err(eyre!("At least one chain must be configured"));
        }

        if self.rpc_timeout.is_zero() {
            return Err(eyre!("RPC_TIMEOUT_MS must be greater than zero"));
        }

        let mut seen_chain_ids = HashSet::new();
        for chain in &self.chains {
            if !seen_chain_ids.insert(chain.chain_id) {
                return Err(eyre!(
                    "Duplicate chain ID: {} (chain: {})",
                    chain.chain_id,
                    chain.name
                ));
            }
            validate_rpc_url(&chain.rpc_url, &format!("{}_RPC_URL", chain.name))?;
        }

        let mut seen_routes = HashSet::new();
        for route in &self.routes {
            if route.src_chain_id == route.dest_chain_id {
                return Err(eyre!(
                    "Route source and destination are both chain {}",
                    route.src_chain_id
                ));
            }
            for chain_id in [route.src_chain_id, route.dest_chain_id] {
                if !seen_chain_ids.contains(&chain_id) {
                    return Err(eyre!(
                        "Route {} -> {} references unconfigured chain {}",
                        route.src_chain_id,
                        route.dest_chain_id,
                        chain_id
                    ));
                }
            }
            if !seen_routes.insert((route.dest_chain_id, route.src_chain_id)) {
                return Err(eyre!(
                    "Duplicate route: {} -> {}",
                    route.src_chain_id,
                    route.dest_chain_id
                ));
            }
        }

        Ok(())
    }
}

// ============================================================================
// Environment Variable Loading
// ============================================================================

fn parse_chain_id(key: &str) -> Result<ChainId> {
    let raw = env::var(key).map_err(|_| eyre!("Missing {}", key))?;
    raw.trim()
        .parse::<u64>()
        .map(ChainId)
        .map_err(|_| eyre!("Invalid {}: {:?} is not a chain ID", key, raw))
}

fn parse_count(key: &str) -> Result<usize> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| eyre!("Invalid {}: {:?} is not a count", key, raw)),
        Err(_) => Ok(0),
    }
}

fn load_chains_from_env() -> Result<Vec<ChainConfig>> {
    let count = parse_count("CHAINS_COUNT")?;
    let mut chains = Vec::with_capacity(count);

    for i in 1..=count {
        let prefix = format!("CHAIN_{}", i);

        let name = env::var(format!("{}_NAME", prefix)).unwrap_or_else(|_| format!("chain_{}", i));
        let chain_id = parse_chain_id(&format!("{}_CHAIN_ID", prefix))?;
        let rpc_url = env::var(format!("{}_RPC_URL", prefix))
            .map_err(|_| eyre!("Missing {}_RPC_URL", prefix))?;

        chains.push(ChainConfig {
            name,
            chain_id,
            rpc_url,
        });
    }

    Ok(chains)
}

fn load_routes_from_env() -> Result<Vec<RouteConfig>> {
    let count = parse_count("ROUTES_COUNT")?;
    let mut routes = Vec::with_capacity(count);

    for i in 1..=count {
        let prefix = format!("ROUTE_{}", i);

        let src_chain_id = parse_chain_id(&format!("{}_SRC_CHAIN_ID", prefix))?;
        let dest_chain_id = parse_chain_id(&format!("{}_DEST_CHAIN_ID", prefix))?;

        let sync_key = format!("{}_CROSS_CHAIN_SYNC_ADDRESS", prefix);
        let cross_chain_sync_address = parse_contract_address(
            &env::var(&sync_key).map_err(|_| eyre!("Missing {}", sync_key))?,
            &sync_key,
        )?;

        routes.push(RouteConfig {
            src_chain_id,
            dest_chain_id,
            cross_chain_sync_address,
        });
    }

    Ok(routes)
}

// ============================================================================
// Tests
// ============================================================================
