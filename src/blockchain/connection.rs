//! Connection context: the provider every call goes through and the account
//! writes are sent from.
//!
//! # Connectors
//! - `Injected`: local private key, signing happens in-process
//! - `Bridge`: remote signing node; handshake checks chain id and accounts
//! - `ReadOnly`: provider only, writes report `NotConnected`

use std::time::Duration;

use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use tokio::time::timeout;

use crate::blockchain::transaction::classify_transport_error;
use crate::blockchain::types::{GatewayError, GatewayResult};
use crate::blockchain::wallet::Wallet;

/// How to reach the chain.
#[derive(Debug, Clone)]
pub enum Connector {
    Injected { rpc_url: String, wallet: Wallet },
    Bridge { rpc_url: String },
    ReadOnly { rpc_url: String },
}

impl Connector {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Injected { .. } => "injected",
            Self::Bridge { .. } => "bridge",
            Self::ReadOnly { .. } => "read_only",
        }
    }

    fn rpc_url(&self) -> &str {
        match self {
            Self::Injected { rpc_url, .. }
            | Self::Bridge { rpc_url }
            | Self::ReadOnly { rpc_url } => rpc_url,
        }
    }
}

/// An established connection.
#[derive(Clone)]
pub struct Connection {
    provider: DynProvider,
    account: Option<Address>,
    kind: &'static str,
}

impl Connection {
    /// Build a connection. Only the bridge connector talks to the network
    /// here; `expected_chain_id` and `rpc_timeout` apply to its handshake.
    pub async fn establish(
        connector: Connector,
        expected_chain_id: u64,
        rpc_timeout: Duration,
    ) -> GatewayResult<Self> {
        let kind = connector.kind();
        let url: url::Url = connector.rpc_url().parse().map_err(|e| {
            GatewayError::Rpc(format!("Invalid RPC URL '{}': {}", connector.rpc_url(), e))
        })?;

        match connector {
            Connector::Injected { wallet, .. } => {
                let account = wallet.address();
                let provider = ProviderBuilder::new()
                    .wallet(wallet.into_ethereum_wallet())
                    .connect_http(url)
                    .erased();
                Ok(Self {
                    provider,
                    account: Some(account),
                    kind,
                })
            }
            Connector::Bridge { .. } => {
                let provider = ProviderBuilder::new().connect_http(url).erased();
                let account = handshake(&provider, expected_chain_id, rpc_timeout).await?;
                Ok(Self {
                    provider,
                    account: Some(account),
                    kind,
                })
            }
            Connector::ReadOnly { .. } => Ok(Self {
                provider: ProviderBuilder::new().connect_http(url).erased(),
                account: None,
                kind,
            }),
        }
    }

    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    /// Account writes are sent from, if any.
    pub fn account(&self) -> Option<Address> {
        self.account
    }

    /// The account, or `NoSigner` for read-only connections.
    pub fn signer(&self) -> GatewayResult<Address> {
        self.account.ok_or(GatewayError::NoSigner)
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("kind", &self.kind)
            .field("account", &self.account)
            .finish()
    }
}

/// Check the remote node serves the expected chain and exposes an account.
async fn handshake(
    provider: &DynProvider,
    expected_chain_id: u64,
    rpc_timeout: Duration,
) -> GatewayResult<Address> {
    let secs = rpc_timeout.as_secs();

    let chain_id = timeout(rpc_timeout, provider.get_chain_id())
        .await
        .map_err(|_| GatewayError::Timeout(secs))?
        .map_err(|e| classify_transport_error(&e))?;
    if chain_id != expected_chain_id {
        return Err(GatewayError::ChainMismatch {
            expected: expected_chain_id,
            actual: chain_id,
        });
    }

    let accounts = timeout(rpc_timeout, provider.get_accounts())
        .await
        .map_err(|_| GatewayError::Timeout(secs))?
        .map_err(|e| classify_transport_error(&e))?;

    accounts.first().copied().ok_or(GatewayError::NoAccounts)
}
