//! Chain-level error types.

/// Errors raised by the ledger query client, the wallet capability and the
/// transaction helpers.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// HTTP transport failure talking to the full node.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The node answered with a JSON-RPC error object.
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// A response could not be decoded into the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// JSON serialization / deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The wallet refused to sign, or the network rejected the submission.
    #[error("Wallet rejected transaction: {0}")]
    WalletRejected(String),

    /// No account is connected in the wallet.
    #[error("Wallet not connected")]
    NotConnected,

    /// A display amount that cannot be represented in minor units.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Unknown network: {0}")]
    UnknownNetwork(String),

    #[error("Invalid RPC URL: {0}")]
    InvalidUrl(String),

    /// A transaction grew past what a `u16` argument index can address.
    #[error("Transaction has too many {0}")]
    TransactionTooLarge(&'static str),
}

impl From<reqwest::Error> for ChainError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}
