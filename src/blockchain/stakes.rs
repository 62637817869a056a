//! Stake records and their grouping by item type.

use std::collections::BTreeMap;
use std::future::Future;

use alloy::primitives::{Address, U256};
use serde::Serialize;

use crate::blockchain::contracts::IPogStaking::StakeInfo;
use crate::blockchain::types::{GatewayError, GatewayResult};

/// A locked-box position as reported by the staking contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stake {
    /// Stake id, rendered in decimal.
    pub stake_id: String,
    pub amount: u64,
    pub claimed: u64,
    /// Unix seconds.
    pub stake_time: u64,
    /// Always 0.
    pub extra_items: u64,
}

/// Stakes grouped by item type, ascending by item id. Within a bucket the
/// order is the order the contract returned them in.
pub type StakeCollection = BTreeMap<U256, Vec<Stake>>;

/// One entry of `getStakes`, decoupled from the ABI integer widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StakeDetail {
    pub item: U256,
    pub amount: u64,
    pub claimed: u64,
    pub stake_time: u64,
}

impl From<StakeInfo> for StakeDetail {
    fn from(info: StakeInfo) -> Self {
        Self {
            item: U256::from(info.item),
            amount: u64::from(info.amount),
            claimed: info.claimed.to::<u64>(),
            stake_time: u64::from(info.stakeTime),
        }
    }
}

/// Source of on-chain stake data.
pub trait StakeReader {
    /// Stake ids owned by `account`.
    fn stake_ids(&self, account: Address) -> impl Future<Output = GatewayResult<Vec<U256>>> + Send;

    /// Stake details for `account`, parallel to [`StakeReader::stake_ids`].
    fn stake_details(
        &self,
        account: Address,
    ) -> impl Future<Output = GatewayResult<Vec<StakeDetail>>> + Send;
}

/// Fetch and group the stakes of `account`.
///
/// The detail list is only requested when the account has at least one
/// stake id.
pub async fn collect_stakes<R: StakeReader>(
    reader: &R,
    account: Address,
) -> GatewayResult<StakeCollection> {
    let ids = reader.stake_ids(account).await?;
    if ids.is_empty() {
        return Ok(StakeCollection::new());
    }

    let details = reader.stake_details(account).await?;
    group_stakes(&ids, &details)
}

/// Group parallel id/detail lists into buckets keyed by item type.
pub fn group_stakes(ids: &[U256], details: &[StakeDetail]) -> GatewayResult<StakeCollection> {
    if ids.len() != details.len() {
        return Err(GatewayError::StakeCountMismatch {
            ids: ids.len(),
            records: details.len(),
        });
    }

    let mut staked = StakeCollection::new();
    for (id, detail) in ids.iter().zip(details) {
        staked.entry(detail.item).or_default().push(Stake {
            stake_id: id.to_string(),
            amount: detail.amount,
            claimed: detail.claimed,
            stake_time: detail.stake_time,
            extra_items: 0,
        });
    }

    Ok(staked)
}
