//! Chain gateway for the POG box game: token and box balances, approvals,
//! staking and claiming against the deployed POG contracts.

pub mod blockchain;
pub mod config;
pub mod observability;

pub use blockchain::{Connector, Gateway, GatewayError, TxOutcome};
pub use config::GatewayConfig;
