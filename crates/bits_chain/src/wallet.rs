use async_trait::async_trait;

use crate::error::ChainError;
use crate::transaction::TransactionBlock;
use crate::types::{Account, TransactionReceipt};

/// A connected signing wallet (browser extension, hardware device, ...).
///
/// The wallet owns the account: callers never hold keys and only learn the
/// address after a successful [`Wallet::connect`].
#[async_trait]
pub trait Wallet: Send + Sync {
    /// Ask the user to connect and return the selected account.
    async fn connect(&self) -> Result<Account, ChainError>;

    async fn disconnect(&self) -> Result<(), ChainError>;

    /// Currently connected account, if any.
    fn account(&self) -> Option<Account>;

    /// Sign `tx` with the connected account and broadcast it.
    ///
    /// Fails with [`ChainError::WalletRejected`] when the user declines or the
    /// network refuses the transaction.
    async fn sign_and_execute(&self, tx: &TransactionBlock)
    -> Result<TransactionReceipt, ChainError>;
}
