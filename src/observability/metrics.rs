//! Metrics collection.
//!
//! # Metrics
//! - `pog_transactions_total` (counter): submitted transactions by op, outcome
//! - `pog_reads_total` (counter): contract reads by op, outcome
//!
//! The crate never installs a recorder; the embedding process decides where
//! these go.

use crate::blockchain::types::TxOutcome;

/// Record a finished transaction.
pub fn record_transaction(op: &'static str, outcome: &TxOutcome) {
    let label = match &outcome.failure {
        None => "success",
        Some(failure) => failure.kind.as_str(),
    };
    ::metrics::counter!("pog_transactions_total", "op" => op, "outcome" => label).increment(1);
}

/// Record a finished read.
pub fn record_read(op: &'static str, ok: bool) {
    let label = if ok { "success" } else { "error" };
    ::metrics::counter!("pog_reads_total", "op" => op, "outcome" => label).increment(1);
}
