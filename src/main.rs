//! Bridge Sync Checker CLI
//!
//! Evaluates a JSON array of bridge transactions against the configured chains
//! and prints one JSON line per transaction.
//!
//! ```text
//! bridge-sync-checker transactions.json
//! ```

use std::sync::Arc;

use eyre::{eyre, Result, WrapErr};
use sync_checker::{BridgeTransaction, Config, ProcessableChecker};
use tracing::info;

fn main() -> Result<()> {
    color_eyre::install()?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async_main())
}

async fn async_main() -> Result<()> {
    init_logging();

    let path = std::env::args()
        .nth(1)
        .ok_or_else(|| eyre!("usage: bridge-sync-checker <transactions.json>"))?;

    let config = Config::load()?;
    info!(
        chains = config.chains().len(),
        routes = config.routes().len(),
        rpc_timeout_ms = config.rpc_timeout().as_millis() as u64,
        "Configuration loaded"
    );

    let raw = tokio::fs::read_to_string(&path)
        .await
        .wrap_err_with(|| format!("Failed to read {}", path))?;
    let txs: Vec<BridgeTransaction> =
        serde_json::from_str(&raw).wrap_err_with(|| format!("Failed to parse {}", path))?;

    let checker = ProcessableChecker::new(Arc::new(config.routing_table()), config.chain_clients()?);
    let verdicts = checker.evaluate_all(&txs).await;

    for (tx, verdict) in txs.iter().zip(&verdicts) {
        let line = serde_json::json!({
            "hash": tx.hash,
            "src_chain_id": tx.src_chain_id,
            "dest_chain_id": tx.dest_chain_id,
            "processable": verdict.is_processable(),
            "reason": verdict.reason(),
        });
        println!("{}", line);
    }

    let processable = verdicts.iter().filter(|v| v.is_processable()).count();
    info!(
        total = verdicts.len(),
        processable, "Evaluation complete"
    );
    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sync_checker=debug,bridge_sync_checker=debug"));

    // stdout carries the verdicts
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
