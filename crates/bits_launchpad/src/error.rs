use bits_chain::ChainError;

/// Reasons a launchpad operation did not submit or did not complete.
///
/// Only purchases hand these back to the caller; the other operations log
/// them and leave the dashboard untouched.
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("Wallet not connected")]
    NotConnected,

    #[error("Amount must be greater than zero, got {0}")]
    InvalidAmount(f64),

    #[error("No native coins available for gas")]
    NoGasCoins,

    #[error("Insufficient gas balance: {available} < {required} minor units")]
    InsufficientGas { available: u128, required: u64 },

    #[error("No token coins owned")]
    NoTokenCoins,

    #[error("Insufficient token balance: {available} < {required} minor units")]
    InsufficientBalance { available: u128, required: u64 },

    #[error("No coin holds {required} minor units and there is nothing to merge")]
    NoSufficientCoin { required: u64 },

    #[error("Unknown stake position: {0}")]
    UnknownStake(String),

    #[error("Stake position already unstaked: {0}")]
    AlreadyUnstaked(String),

    #[error("Rewards locked for another {remaining_ms} ms")]
    RewardsLocked { remaining_ms: i64 },

    #[error(transparent)]
    Chain(#[from] ChainError),
}
