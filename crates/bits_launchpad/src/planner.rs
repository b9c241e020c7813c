//! Transaction planning: turns a requested operation plus the account's coins
//! into a ready-to-sign [`TransactionBlock`].
//!
//! Everything here is pure so coin selection can be checked without a node
//! or a wallet.

use bits_chain::{
    ChainError, CoinRecord, ContractConfig, EntryPoint, TransactionBlock, sum_balances,
};

use crate::error::LaunchError;

/// Gas budget attached to stake transactions, minor units.
pub const STAKE_GAS_BUDGET: u64 = 20_000_000;

/// Native balance required before a stake is attempted (0.02 units).
pub const MIN_STAKE_GAS_BALANCE: u64 = 20_000_000;

/// Native balance considered enough to pay for a purchase (0.1 units).
pub const MIN_PURCHASE_GAS_BALANCE: u64 = 100_000_000;

/// How a stake transaction sources its tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoinSelection {
    /// One existing coin already covers the amount.
    Single(String),
    /// All listed coins are merged into the first one before staking.
    Merged(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct StakePlan {
    pub selection: CoinSelection,
    pub transaction: TransactionBlock,
}

/// Buy tokens with `amount` minor units of the native asset: split the
/// payment off the gas coin, call `buy_tokens`, hand the coin back to
/// `sender`.
pub fn build_purchase(
    contract: &ContractConfig,
    sender: &str,
    amount: u64,
) -> Result<TransactionBlock, ChainError> {
    let mut tx = TransactionBlock::new();
    let amount_arg = tx.pure_u64(amount)?;
    let gas = tx.gas();
    let payment = tx.split_coins(gas, vec![amount_arg])?;
    let pool = tx.object(&contract.pool_state_id)?;

    tx.move_call(
        contract.target(EntryPoint::BuyTokens),
        vec![pool, payment[0], amount_arg],
    )?;
    let recipient = tx.pure_address(sender)?;
    tx.transfer_objects(vec![payment[0]], recipient)?;
    Ok(tx)
}

/// Pick token coins for a stake of `amount` minor units and build the
/// transaction.
///
/// The first coin (in ledger order) holding at least `amount` is used as-is.
/// Failing that, several smaller coins are merged into the first one inside
/// the same transaction. Gas is paid from the first native coin.
pub fn plan_stake(
    contract: &ContractConfig,
    gas_coins: &[CoinRecord],
    token_coins: &[CoinRecord],
    amount: u64,
) -> Result<StakePlan, LaunchError> {
    let gas_coin = gas_coins.first().ok_or(LaunchError::NoGasCoins)?;
    let gas_total = sum_balances(gas_coins);
    if gas_total < u128::from(MIN_STAKE_GAS_BALANCE) {
        return Err(LaunchError::InsufficientGas {
            available: gas_total,
            required: MIN_STAKE_GAS_BALANCE,
        });
    }

    if token_coins.is_empty() {
        return Err(LaunchError::NoTokenCoins);
    }
    let token_total = sum_balances(token_coins);
    if token_total < u128::from(amount) {
        return Err(LaunchError::InsufficientBalance {
            available: token_total,
            required: amount,
        });
    }

    let mut tx = TransactionBlock::new();
    tx.set_gas_budget(STAKE_GAS_BUDGET);
    tx.set_gas_payment(vec![gas_coin.object_ref()]);

    let (selection, stake_coin) = match token_coins.iter().find(|coin| coin.balance >= amount) {
        Some(coin) => {
            let pool = tx.object(&contract.stake_pool_id)?;
            let arg = tx.object(&coin.coin_object_id)?;
            (CoinSelection::Single(coin.coin_object_id.clone()), (pool, arg))
        }
        None if token_coins.len() > 1 => {
            let pool = tx.object(&contract.stake_pool_id)?;
            let primary = tx.object(&token_coins[0].coin_object_id)?;
            for coin in &token_coins[1..] {
                let source = tx.object(&coin.coin_object_id)?;
                tx.merge_coins(primary, vec![source])?;
            }
            let ids = token_coins
                .iter()
                .map(|coin| coin.coin_object_id.clone())
                .collect();
            (CoinSelection::Merged(ids), (pool, primary))
        }
        None => return Err(LaunchError::NoSufficientCoin { required: amount }),
    };

    let (pool, coin) = stake_coin;
    let amount_arg = tx.pure_u64(amount)?;
    let clock = tx.object(&contract.clock_id)?;
    tx.move_call(
        contract.target(EntryPoint::StakeTokens),
        vec![pool, coin, amount_arg, clock],
    )?;

    Ok(StakePlan {
        selection,
        transaction: tx,
    })
}

/// Withdraw `amount` minor units from the position `stake_id`.
pub fn build_unstake(
    contract: &ContractConfig,
    stake_id: &str,
    amount: u64,
) -> Result<TransactionBlock, ChainError> {
    let mut tx = TransactionBlock::new();
    let pool = tx.object(&contract.stake_pool_id)?;
    let stake = tx.object(stake_id)?;
    let amount_arg = tx.pure_u64(amount)?;
    tx.move_call(
        contract.target(EntryPoint::UnstakeTokens),
        vec![pool, stake, amount_arg],
    )?;
    Ok(tx)
}

pub fn build_claim(contract: &ContractConfig, stake_id: &str) -> Result<TransactionBlock, ChainError> {
    let mut tx = TransactionBlock::new();
    let pool = tx.object(&contract.stake_pool_id)?;
    let stake = tx.object(stake_id)?;
    let clock = tx.object(&contract.clock_id)?;
    tx.move_call(
        contract.target(EntryPoint::ClaimRewards),
        vec![pool, stake, clock],
    )?;
    Ok(tx)
}
