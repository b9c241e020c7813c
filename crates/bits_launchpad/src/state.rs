use bits_chain::{Account, format_display, to_display_units};
use serde::{Deserialize, Serialize};

use crate::countdown;

/// Tokens received per native unit spent at the sale's fixed rate.
pub const TOKENS_PER_NATIVE: f64 = 100.0;

/// How long the purchase / stake celebration stays up.
pub const CELEBRATION_MS: i64 = 5_000;

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// Which dashboard form is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActiveTab {
    #[default]
    Buy,
    Stake,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StakeStatus {
    Staked,
    Unstaked,
}

/// One staking position, as last seen on the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakePosition {
    pub id: String,
    /// Staked amount in minor units.
    pub amount: u64,
    /// Last on-chain update, Unix milliseconds.
    pub last_update_time: u64,
    pub status: StakeStatus,
}

impl StakePosition {
    pub fn display_amount(&self) -> f64 {
        to_display_units(self.amount)
    }

    pub fn is_staked(&self) -> bool {
        self.status == StakeStatus::Staked
    }
}

/// Everything the dashboard renders.
///
/// Balances and stake history only ever come from the most recent successful
/// ledger query; the single exception is the optimistic `Unstaked` mark,
/// which the next stake refresh discards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub account: Option<Account>,
    pub active_tab: ActiveTab,
    /// Pending purchase input, native units.
    pub purchase_amount: f64,
    /// Pending stake input, token units.
    pub stake_amount: f64,
    pub token_balance_minor: u128,
    pub native_balance_minor: u128,
    pub stake_history: Vec<StakePosition>,
    /// When this session last staked, Unix milliseconds. Not persisted.
    pub last_stake_time_ms: Option<i64>,
    /// Countdown value as of the last tick.
    pub time_remaining_ms: i64,
    pub celebrate_until_ms: Option<i64>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }

    pub fn set_active_tab(&mut self, tab: ActiveTab) {
        self.active_tab = tab;
    }

    /// Token balance with two decimals.
    pub fn token_balance(&self) -> String {
        format_display(self.token_balance_minor)
    }

    /// Native balance with two decimals.
    pub fn native_balance(&self) -> String {
        format_display(self.native_balance_minor)
    }

    /// Tokens the pending purchase would yield.
    pub fn purchase_preview(&self) -> f64 {
        self.purchase_amount * TOKENS_PER_NATIVE
    }

    pub fn can_purchase(&self) -> bool {
        self.is_connected() && self.purchase_amount > 0.0
    }

    pub fn can_stake(&self) -> bool {
        self.is_connected() && self.stake_amount > 0.0
    }

    /// Reward wait left at `now_ms`, computed from the stake time rather than
    /// the last tick.
    pub fn remaining_ms(&self, now_ms: i64) -> i64 {
        countdown::remaining_ms(self.last_stake_time_ms, now_ms)
    }

    pub fn can_claim(&self, now_ms: i64) -> bool {
        self.is_connected() && self.remaining_ms(now_ms) == 0
    }

    /// `m:ss` rendering of the ticked countdown.
    pub fn time_remaining_label(&self) -> String {
        countdown::format_time_remaining(self.time_remaining_ms)
    }

    pub fn celebrate(&mut self, now_ms: i64) {
        self.celebrate_until_ms = Some(now_ms + CELEBRATION_MS);
    }

    pub fn is_celebrating(&self, now_ms: i64) -> bool {
        self.celebrate_until_ms.is_some_and(|until| now_ms < until)
    }

    pub fn position(&self, id: &str) -> Option<&StakePosition> {
        self.stake_history.iter().find(|stake| stake.id == id)
    }

    /// Optimistically flag a position as unstaked. Returns `false` when the id
    /// is not in the history.
    pub fn mark_unstaked(&mut self, id: &str) -> bool {
        match self.stake_history.iter_mut().find(|stake| stake.id == id) {
            Some(stake) => {
                stake.status = StakeStatus::Unstaked;
                true
            }
            None => false,
        }
    }

    pub fn staked_positions(&self) -> impl Iterator<Item = &StakePosition> {
        self.stake_history.iter().filter(|stake| stake.is_staked())
    }

    pub fn has_staked(&self) -> bool {
        self.staked_positions().next().is_some()
    }

    /// Position the single-stake controls act on: the first one still staked.
    pub fn active_stake_id(&self) -> Option<&str> {
        self.staked_positions().next().map(|stake| stake.id.as_str())
    }

    pub fn total_staked_minor(&self) -> u128 {
        self.staked_positions()
            .map(|stake| u128::from(stake.amount))
            .sum()
    }

    /// Drop everything tied to the previous account.
    pub fn reset_account_data(&mut self) {
        self.token_balance_minor = 0;
        self.native_balance_minor = 0;
        self.stake_history.clear();
        self.last_stake_time_ms = None;
        self.time_remaining_ms = 0;
    }
}
