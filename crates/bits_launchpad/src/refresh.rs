//! Ledger reads that feed the dashboard.

use bits_chain::{
    ChainError, ContractConfig, LedgerQuery, ObjectDataOptions, OwnedObject, sum_balances,
};
use tracing::debug;

use crate::state::{StakePosition, StakeStatus};

/// Aggregate balances of one account, minor units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BalanceSnapshot {
    pub token: u128,
    pub native: u128,
}

/// Total balance of `coin_type` held by `owner`.
pub async fn fetch_balance(
    ledger: &dyn LedgerQuery,
    owner: &str,
    coin_type: &str,
) -> Result<u128, ChainError> {
    let coins = ledger.get_coins(owner, coin_type).await?;
    let total = sum_balances(&coins);
    debug!(owner, coin_type, coins = coins.len(), total = %total, "balance fetched");
    Ok(total)
}

/// All stake positions owned by `owner`, in ledger order.
pub async fn fetch_stake_positions(
    ledger: &dyn LedgerQuery,
    contract: &ContractConfig,
    owner: &str,
) -> Result<Vec<StakePosition>, ChainError> {
    let objects = ledger
        .get_owned_objects(
            owner,
            &contract.stake_info_type(),
            ObjectDataOptions::content_and_type(),
        )
        .await?;
    let positions: Vec<StakePosition> = objects.iter().filter_map(parse_stake_position).collect();
    debug!(owner, objects = objects.len(), positions = positions.len(), "stake positions fetched");
    Ok(positions)
}

/// Read a `StakeInfo` object. Missing numeric fields read as zero; objects
/// without an id are skipped. The ledger carries no lifecycle status, so
/// every position comes back `Staked`.
pub fn parse_stake_position(object: &OwnedObject) -> Option<StakePosition> {
    if object.object_id.is_empty() {
        return None;
    }
    Some(StakePosition {
        id: object.object_id.clone(),
        amount: object.u64_field("amount").unwrap_or_default(),
        last_update_time: object.u64_field("last_update_time").unwrap_or_default(),
        status: StakeStatus::Staked,
    })
}
