//! Token purchase and staking dashboard logic for the BITS launchpad.
//!
//! [`Launchpad`] coordinates a [`bits_chain::Wallet`], a
//! [`bits_chain::LedgerQuery`] and the [`DashboardState`] the UI renders.

pub mod clock;
pub mod countdown;
pub mod error;
pub mod launchpad;
pub mod planner;
pub mod refresh;
pub mod state;

pub use clock::{Clock, ManualClock, SystemClock};
pub use countdown::{REWARD_WAIT_MS, format_time_remaining, remaining_ms};
pub use error::LaunchError;
pub use launchpad::Launchpad;
pub use planner::{CoinSelection, StakePlan, build_claim, build_purchase, build_unstake, plan_stake};
pub use refresh::BalanceSnapshot;
pub use state::{ActiveTab, DashboardState, StakePosition, StakeStatus};
