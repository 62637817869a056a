//! Blockchain gateway subsystem.
//!
//! # Data Flow
//! ```text
//! Environment (private key) / config (RPC URLs, chain id)
//!     → wallet.rs, connection.rs (signer + provider)
//!     → gateway.rs (one method per contract operation)
//!         reads  → contracts.rs bindings → units.rs / stakes.rs shaping
//!         writes → transaction.rs (send, confirm, reduce to TxOutcome)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys
//! - Contract addresses are compiled in

pub mod connection;
pub mod contracts;
pub mod gateway;
pub mod stakes;
pub mod transaction;
pub mod types;
pub mod units;
pub mod wallet;

pub use connection::{Connection, Connector};
pub use gateway::{Gateway, ItemBalance};
pub use stakes::{Stake, StakeCollection};
pub use types::{FailureKind, GatewayError, GatewayResult, TxFailure, TxOutcome};
pub use wallet::Wallet;
