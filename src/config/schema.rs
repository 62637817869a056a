//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! Contract addresses are not part of the schema; they are compiled in
//! (see `blockchain::contracts`).

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Chain endpoints and transaction settings.
    pub network: NetworkConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Network configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// JSON-RPC endpoint used for reads and for the local key signer.
    pub rpc_url: String,

    /// JSON-RPC endpoint of the remote signing node (bridge connector).
    pub bridge_url: String,

    /// Chain ID (56 for BNB Smart Chain, 31337 for local Anvil).
    pub chain_id: u64,

    /// Timeout for reads and the bridge handshake, in seconds.
    pub rpc_timeout_secs: u64,

    /// Block confirmations awaited before a receipt is reported.
    pub confirmation_blocks: u64,

    /// Maximum time to wait for a receipt, in seconds.
    pub confirmation_timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://bsc-dataseed.binance.org".to_string(),
            bridge_url: "http://localhost:8545".to_string(),
            chain_id: 56,
            rpc_timeout_secs: 10,
            confirmation_blocks: 1,
            confirmation_timeout_secs: 120,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format: "pretty" or "json".
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}
