//! The gateway: every chain read and write the application performs.
//!
//! Reads return [`GatewayResult`] and propagate classified errors. Writes
//! return a [`TxOutcome`] and never fail; the same classification ends up in
//! `outcome.failure`. Both paths log failures and record metrics.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use alloy::contract::Error as ContractError;
use alloy::primitives::{Address, U256};
use arc_swap::ArcSwapOption;
use serde::{Serialize, Serializer};
use tokio::time::timeout;

use crate::blockchain::connection::{Connection, Connector};
use crate::blockchain::contracts::{
    IPogItems, IPogStaking, IPogToken, ITEMS_ADDRESS, ITEM_IDS, STAKING_ADDRESS, TOKEN_ADDRESS,
    TOKEN_DECIMALS,
};
use crate::blockchain::stakes::{collect_stakes, StakeCollection, StakeDetail, StakeReader};
use crate::blockchain::transaction::{classify_contract_error, settle, TxSender};
use crate::blockchain::types::{GatewayError, GatewayResult, TxOutcome};
use crate::blockchain::units::{display_units, is_pre_approved, parse_display};
use crate::config::NetworkConfig;
use crate::observability::metrics;

/// Balance of one box type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ItemBalance {
    pub item_id: u64,
    #[serde(serialize_with = "serialize_decimal")]
    pub balance: U256,
}

fn serialize_decimal<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// Single entry point to the POG contracts.
///
/// Holds the current [`Connection`]; everything else is fetched fresh on
/// each call. Reconnecting swaps the connection atomically, so calls already
/// in flight finish on the connection they started with.
pub struct Gateway {
    config: NetworkConfig,
    sender: TxSender,
    connection: ArcSwapOption<Connection>,
}

impl Gateway {
    pub fn new(config: NetworkConfig) -> Self {
        Self {
            sender: TxSender::from_config(&config),
            config,
            connection: ArcSwapOption::empty(),
        }
    }

    /// Connect (or reconnect) through `connector`.
    ///
    /// On failure the error is logged and the previous connection, if any,
    /// stays in place. Returns the signing account; `None` for read-only.
    pub async fn connect(&self, connector: Connector) -> GatewayResult<Option<Address>> {
        let kind = connector.kind();
        let rpc_timeout = Duration::from_secs(self.config.rpc_timeout_secs);

        match Connection::establish(connector, self.config.chain_id, rpc_timeout).await {
            Ok(connection) => {
                let account = connection.account();
                tracing::info!(connector = kind, account = ?account, "Wallet connected");
                self.connection.store(Some(Arc::new(connection)));
                Ok(account)
            }
            Err(e) => {
                tracing::error!(connector = kind, error = %e, "Wallet connection failed");
                Err(e)
            }
        }
    }

    /// Drop the current connection.
    pub fn disconnect(&self) {
        self.connection.store(None);
    }

    pub fn is_connected(&self) -> bool {
        self.connection.load().is_some()
    }

    /// Connected signing account, if any.
    pub fn account(&self) -> Option<Address> {
        self.connection.load().as_ref().and_then(|c| c.account())
    }

    fn connection(&self) -> GatewayResult<Arc<Connection>> {
        self.connection.load_full().ok_or(GatewayError::NotConnected)
    }

    async fn read<T, F>(&self, op: &'static str, call: F) -> GatewayResult<T>
    where
        F: IntoFuture<Output = Result<T, ContractError>>,
    {
        let secs = self.config.rpc_timeout_secs;
        let result = match timeout(Duration::from_secs(secs), call.into_future()).await {
            Ok(result) => result.map_err(classify_contract_error),
            Err(_) => Err(GatewayError::Timeout(secs)),
        };

        if let Err(e) = &result {
            tracing::error!(op, kind = e.kind().as_str(), error = %e, "Read failed");
        }
        metrics::record_read(op, result.is_ok());
        result
    }

    // Reads

    /// POG balance of `account`, as a display string (`"1000.0"`).
    pub async fn token_balance(&self, account: Address) -> GatewayResult<String> {
        tracing::info!(%account, "Fetching token balance");
        let conn = self.connection()?;
        let token = IPogToken::new(TOKEN_ADDRESS, conn.provider().clone());
        let call = token.balanceOf(account);
        let raw = self.read("token_balance", call.call()).await?;
        display_units(raw, TOKEN_DECIMALS)
    }

    /// Balances of boxes 5, 4, 2, 3 and 1, in that order.
    pub async fn item_balances(&self, account: Address) -> GatewayResult<Vec<ItemBalance>> {
        tracing::info!(%account, "Fetching box balances");
        let conn = self.connection()?;
        let items = IPogItems::new(ITEMS_ADDRESS, conn.provider().clone());

        let accounts = vec![account; ITEM_IDS.len()];
        let ids = ITEM_IDS.iter().map(|id| U256::from(*id)).collect();
        let call = items.balanceOfBatch(accounts, ids);
        let balances: Vec<U256> = self.read("item_balances", call.call()).await?;

        if balances.len() != ITEM_IDS.len() {
            return Err(GatewayError::BatchLengthMismatch {
                asked: ITEM_IDS.len(),
                returned: balances.len(),
            });
        }

        Ok(ITEM_IDS
            .iter()
            .zip(balances)
            .map(|(item_id, balance)| ItemBalance {
                item_id: *item_id,
                balance,
            })
            .collect())
    }

    /// Raw balance of a single box type.
    pub async fn item_balance(&self, account: Address, item_id: u64) -> GatewayResult<U256> {
        tracing::info!(%account, item_id, "Fetching box balance");
        let conn = self.connection()?;
        let items = IPogItems::new(ITEMS_ADDRESS, conn.provider().clone());
        let call = items.balanceOf(account, U256::from(item_id));
        self.read("item_balance", call.call()).await
    }

    /// Whether `account` has already approved the staking contract to move
    /// its tokens.
    pub async fn check_approve(&self, account: Address) -> GatewayResult<bool> {
        tracing::info!(%account, "Checking token approval");
        let conn = self.connection()?;
        let token = IPogToken::new(TOKEN_ADDRESS, conn.provider().clone());
        let call = token.allowance(account, STAKING_ADDRESS);
        let allowance = self.read("check_approve", call.call()).await?;
        Ok(is_pre_approved(allowance))
    }

    /// Whether `account` has approved the staking contract for its boxes.
    pub async fn check_items_approved(&self, account: Address) -> GatewayResult<bool> {
        tracing::info!(%account, "Checking box approval");
        let conn = self.connection()?;
        let items = IPogItems::new(ITEMS_ADDRESS, conn.provider().clone());
        let call = items.isApprovedForAll(account, STAKING_ADDRESS);
        self.read("check_items_approved", call.call()).await
    }

    /// Stakes of `account`, grouped by item type.
    pub async fn get_stakes(&self, account: Address) -> GatewayResult<StakeCollection> {
        tracing::info!(%account, "Fetching stakes");
        collect_stakes(self, account).await
    }

    // Writes

    /// Send `amount` POG (display units, e.g. `"12.5"`) to `to`.
    pub async fn transfer_tokens(&self, to: Address, amount: &str) -> TxOutcome {
        tracing::info!(%to, amount, "Sending tokens");
        settle("transfer_tokens", async {
            let raw = parse_display(amount, TOKEN_DECIMALS)?;
            let conn = self.connection()?;
            let from = conn.signer()?;
            let token = IPogToken::new(TOKEN_ADDRESS, conn.provider().clone());
            self.sender.send(token.transfer(to, raw), from).await
        })
        .await
    }

    /// Approve the staking contract to spend an unlimited amount of POG.
    pub async fn approve_tokens(&self) -> TxOutcome {
        tracing::info!("Approving tokens for staking");
        settle("approve_tokens", async {
            let conn = self.connection()?;
            let from = conn.signer()?;
            let token = IPogToken::new(TOKEN_ADDRESS, conn.provider().clone());
            self.sender
                .send(token.approve(STAKING_ADDRESS, U256::MAX), from)
                .await
        })
        .await
    }

    /// Approve the staking contract to move all boxes.
    pub async fn approve_items(&self) -> TxOutcome {
        tracing::info!("Approving boxes for staking");
        settle("approve_items", async {
            let conn = self.connection()?;
            let from = conn.signer()?;
            let items = IPogItems::new(ITEMS_ADDRESS, conn.provider().clone());
            self.sender
                .send(items.setApprovalForAll(STAKING_ADDRESS, true), from)
                .await
        })
        .await
    }

    /// Lock `amount` boxes of type `item`.
    pub async fn stake(&self, item: u16, amount: u16) -> TxOutcome {
        tracing::info!(item, amount, "Staking boxes");
        settle("stake", async {
            let conn = self.connection()?;
            let from = conn.signer()?;
            let staking = IPogStaking::new(STAKING_ADDRESS, conn.provider().clone());
            self.sender.send(staking.stake(item, amount), from).await
        })
        .await
    }

    /// Withdraw the given stakes.
    pub async fn withdraw(&self, stake_ids: Vec<U256>) -> TxOutcome {
        tracing::info!(stakes = ?stake_ids, "Withdrawing stakes");
        settle("withdraw", async {
            let conn = self.connection()?;
            let from = conn.signer()?;
            let staking = IPogStaking::new(STAKING_ADDRESS, conn.provider().clone());
            self.sender.send(staking.withdraw(stake_ids), from).await
        })
        .await
    }

    /// Claim rewards for the given stakes.
    pub async fn claim(&self, stake_ids: Vec<U256>) -> TxOutcome {
        tracing::info!(stakes = ?stake_ids, "Claiming rewards");
        settle("claim", async {
            let conn = self.connection()?;
            let from = conn.signer()?;
            let staking = IPogStaking::new(STAKING_ADDRESS, conn.provider().clone());
            self.sender.send(staking.claim(stake_ids), from).await
        })
        .await
    }
}

impl StakeReader for Gateway {
    async fn stake_ids(&self, account: Address) -> GatewayResult<Vec<U256>> {
        let conn = self.connection()?;
        let staking = IPogStaking::new(STAKING_ADDRESS, conn.provider().clone());
        let call = staking.getStakeIds(account);
        self.read("get_stake_ids", call.call()).await
    }

    async fn stake_details(&self, account: Address) -> GatewayResult<Vec<StakeDetail>> {
        let conn = self.connection()?;
        let staking = IPogStaking::new(STAKING_ADDRESS, conn.provider().clone());
        let call = staking.getStakes(account);
        let records = self.read("get_stakes", call.call()).await?;
        Ok(records.into_iter().map(StakeDetail::from).collect())
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("connection", &self.connection.load_full())
            .finish()
    }
}
