//! Transaction submission, confirmation and error classification.
//!
//! # Responsibilities
//! - Send a contract call from the connected account
//! - Wait for block inclusion with the configured depth and timeout
//! - Reduce the receipt (or the failure) to a [`TxOutcome`]
//! - Classify alloy errors into [`GatewayError`] for reads and writes alike

use std::future::Future;
use std::time::Duration;

use alloy::contract::{CallBuilder, CallDecoder, Error as ContractError};
use alloy::primitives::Address;
use alloy::providers::{PendingTransactionError, Provider, WatchTxError};
use alloy::transports::TransportError;
use tokio::time::timeout;

use crate::blockchain::types::{GatewayError, GatewayResult, ReceiptSummary, TxOutcome};
use crate::config::NetworkConfig;
use crate::observability::metrics;

/// EIP-1193 "user rejected request".
const USER_REJECTED_CODE: i64 = 4001;

/// Geth/Erigon "execution reverted".
const EXECUTION_REVERTED_CODE: i64 = 3;

/// Sends contract calls and waits for their receipts.
#[derive(Debug, Clone, Copy)]
pub struct TxSender {
    send_timeout: Duration,
    confirmation_blocks: u64,
    confirmation_timeout: Duration,
}

impl TxSender {
    pub fn new(
        send_timeout: Duration,
        confirmation_blocks: u64,
        confirmation_timeout: Duration,
    ) -> Self {
        Self {
            send_timeout,
            confirmation_blocks,
            confirmation_timeout,
        }
    }

    pub fn from_config(config: &NetworkConfig) -> Self {
        Self::new(
            Duration::from_secs(config.rpc_timeout_secs),
            config.confirmation_blocks,
            Duration::from_secs(config.confirmation_timeout_secs),
        )
    }

    /// Submit `call` from `from` and wait until it is mined.
    ///
    /// Filling (gas, fees, nonce) and submission are bounded by the RPC
    /// timeout; the receipt wait by the confirmation timeout.
    pub async fn send<P, D>(
        &self,
        call: CallBuilder<P, D>,
        from: Address,
    ) -> GatewayResult<ReceiptSummary>
    where
        P: Provider,
        D: CallDecoder,
    {
        let call = call.from(from);
        let pending = timeout(self.send_timeout, call.send())
            .await
            .map_err(|_| GatewayError::Timeout(self.send_timeout.as_secs()))?
            .map_err(classify_contract_error)?;
        let tx_hash = *pending.tx_hash();
        tracing::debug!(tx_hash = %tx_hash, "Transaction submitted");

        let receipt = pending
            .with_required_confirmations(self.confirmation_blocks)
            .with_timeout(Some(self.confirmation_timeout))
            .get_receipt()
            .await
            .map_err(|e| classify_pending_error(e, self.confirmation_timeout.as_secs()))?;

        Ok(ReceiptSummary {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            status: receipt.status(),
        })
    }
}

/// Await a submission and reduce it to an outcome. Never fails; every error
/// is logged and folded into the outcome.
pub async fn settle<F>(op: &'static str, submission: F) -> TxOutcome
where
    F: Future<Output = GatewayResult<ReceiptSummary>>,
{
    let outcome = match submission.await {
        Ok(receipt) => {
            tracing::debug!(
                op,
                tx_hash = %receipt.tx_hash,
                block_number = ?receipt.block_number,
                status = receipt.status,
                "Receipt received"
            );
            if !receipt.status {
                tracing::error!(op, tx_hash = %receipt.tx_hash, "Transaction reverted on-chain");
            }
            TxOutcome::from_receipt(receipt)
        }
        Err(e) => {
            tracing::error!(op, kind = e.kind().as_str(), error = %e, "Transaction failed");
            TxOutcome::from_error(&e)
        }
    };

    metrics::record_transaction(op, &outcome);
    outcome
}

/// Classify an error returned by a contract call or send.
pub fn classify_contract_error(err: ContractError) -> GatewayError {
    match err {
        ContractError::TransportError(e) => classify_transport_error(&e),
        ContractError::PendingTransactionError(e) => classify_pending_error(e, 0),
        other => GatewayError::Rpc(other.to_string()),
    }
}

/// Classify a JSON-RPC level failure.
pub fn classify_transport_error(err: &TransportError) -> GatewayError {
    match err.as_error_resp() {
        Some(payload) => classify_error_response(payload.code, &payload.message),
        None => GatewayError::Rpc(err.to_string()),
    }
}

/// Classify a JSON-RPC error response by code and message.
pub fn classify_error_response(code: i64, message: &str) -> GatewayError {
    let lowered = message.to_lowercase();
    if code == USER_REJECTED_CODE || lowered.contains("user denied") || lowered.contains("user rejected") {
        GatewayError::Rejected(message.to_string())
    } else if code == EXECUTION_REVERTED_CODE || lowered.contains("revert") {
        GatewayError::Reverted(message.to_string())
    } else {
        GatewayError::Rpc(format!("{} (code {})", message, code))
    }
}

fn classify_pending_error(err: PendingTransactionError, timeout_secs: u64) -> GatewayError {
    match err {
        PendingTransactionError::TransportError(e) => classify_transport_error(&e),
        PendingTransactionError::TxWatcher(WatchTxError::Timeout) => {
            GatewayError::Timeout(timeout_secs)
        }
        other => GatewayError::Confirmation(other.to_string()),
    }
}
