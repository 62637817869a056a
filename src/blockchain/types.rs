//! Gateway result types and error definitions.

use alloy::primitives::TxHash;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during gateway operations.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No connection has been established yet.
    #[error("Gateway not connected")]
    NotConnected,

    /// Connected read-only; there is no account to send from.
    #[error("Connection has no signing account")]
    NoSigner,

    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request or confirmation wait timed out.
    #[error("Timed out after {0} seconds")]
    Timeout(u64),

    /// The signer refused to authorize the transaction.
    #[error("Signature rejected: {0}")]
    Rejected(String),

    /// Transaction reverted, either at estimation or on-chain.
    #[error("Transaction reverted: {0}")]
    Reverted(String),

    /// Remote node serves a different chain than configured.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// Remote node exposes no account to sign with.
    #[error("Remote signer exposes no accounts")]
    NoAccounts,

    /// Invalid private key format or derivation error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// User-supplied amount could not be converted to base units.
    #[error("Invalid amount '{amount}': {reason}")]
    InvalidAmount { amount: String, reason: String },

    /// `getStakeIds` and `getStakes` disagree on the number of stakes.
    #[error("Stake count mismatch: {ids} ids but {records} records")]
    StakeCountMismatch { ids: usize, records: usize },

    /// `balanceOfBatch` returned a different number of balances than ids asked.
    #[error("Batch balance mismatch: asked {asked}, got {returned}")]
    BatchLengthMismatch { asked: usize, returned: usize },

    /// Receipt could not be obtained after submission.
    #[error("Confirmation failed: {0}")]
    Confirmation(String),
}

impl GatewayError {
    /// Coarse category used in outcomes, logs and metrics.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::NotConnected
            | Self::NoSigner
            | Self::ChainMismatch { .. }
            | Self::NoAccounts
            | Self::Wallet(_) => FailureKind::NotConnected,
            Self::Rejected(_) => FailureKind::Rejected,
            Self::Reverted(_) => FailureKind::Reverted,
            Self::Rpc(_) | Self::Confirmation(_) => FailureKind::Network,
            Self::Timeout(_) => FailureKind::Timeout,
            Self::InvalidAmount { .. } => FailureKind::InvalidInput,
            Self::StakeCountMismatch { .. } | Self::BatchLengthMismatch { .. } => {
                FailureKind::InvalidResponse
            }
        }
    }
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Why an operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    NotConnected,
    Rejected,
    Reverted,
    Network,
    Timeout,
    InvalidInput,
    InvalidResponse,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotConnected => "not_connected",
            Self::Rejected => "rejected",
            Self::Reverted => "reverted",
            Self::Network => "network",
            Self::Timeout => "timeout",
            Self::InvalidInput => "invalid_input",
            Self::InvalidResponse => "invalid_response",
        }
    }
}

/// Failure details attached to an unsuccessful transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxFailure {
    pub kind: FailureKind,
    /// Rendered underlying error, for diagnostics.
    pub error: String,
}

/// The parts of a transaction receipt the gateway looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptSummary {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    /// Receipt status: true for 1, false for 0.
    pub status: bool,
}

/// Result of a state-changing operation.
///
/// `success` is true iff the transaction was mined with status 1. Every other
/// case carries a [`TxFailure`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<TxHash>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<TxFailure>,
}

impl TxOutcome {
    /// Outcome for a mined transaction.
    pub fn from_receipt(receipt: ReceiptSummary) -> Self {
        let failure = (!receipt.status).then(|| TxFailure {
            kind: FailureKind::Reverted,
            error: format!("transaction {} mined with status 0", receipt.tx_hash),
        });
        Self {
            success: receipt.status,
            tx_hash: Some(receipt.tx_hash),
            block_number: receipt.block_number,
            failure,
        }
    }

    /// Outcome for a transaction that never produced a receipt.
    pub fn from_error(error: &GatewayError) -> Self {
        Self {
            success: false,
            tx_hash: None,
            block_number: None,
            failure: Some(TxFailure {
                kind: error.kind(),
                error: error.to_string(),
            }),
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.failure.as_ref().map(|f| f.kind)
    }
}
