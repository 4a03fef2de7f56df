//! Prometheus metrics for processability decisions
//!
//! Registered in the default registry; the embedding process decides how to
//! expose them.

use lazy_static::lazy_static;
use prometheus::{register_counter_vec, register_histogram_vec, CounterVec, HistogramVec};

lazy_static! {
    pub static ref DECISIONS: CounterVec = register_counter_vec!(
        "sync_checker_decisions_total",
        "Processability decisions by outcome",
        &["src_chain", "dest_chain", "reason", "processable"]
    ).unwrap();

    pub static ref ORACLE_ERRORS: CounterVec = register_counter_vec!(
        "sync_checker_oracle_errors_total",
        "Failed sync checkpoint reads by error kind",
        &["dest_chain", "kind"]
    ).unwrap();

    pub static ref EVALUATION_LATENCY: HistogramVec = register_histogram_vec!(
        "sync_checker_evaluation_seconds",
        "Time spent on evaluations that queried the chains",
        &["dest_chain"],
        vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    ).unwrap();
}

/// Render all registered metrics in the Prometheus text format
pub fn encode_text() -> String {
    use prometheus::Encoder;

    let encoder = prometheus::TextEncoder::new();
    let mut buffer = Vec::new();
    if encoder
        .encode(&prometheus::gather(), &mut buffer)
        .is_err()
    {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
