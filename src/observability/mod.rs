//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Gateway operations produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (per-operation counters via `metrics`)
//!
//! Consumers:
//!     → stdout/stderr (pretty or JSON)
//!     → whatever recorder the embedding process installs
//! ```
//!
//! # Design Decisions
//! - Structured fields (op, account, tx_hash) rather than formatted strings
//! - Metrics are cheap; with no recorder installed they are no-ops

pub mod logging;
pub mod metrics;
