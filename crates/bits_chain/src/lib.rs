// Sui ledger access, wallet capability and transaction descriptors.

pub mod amount;
pub mod contract;
pub mod error;
pub mod ledger;
pub mod network;
pub mod rpc;
pub mod rpc_config;
pub mod transaction;
pub mod types;
pub mod wallet;

// Re-export primary types for convenient access.
pub use amount::{
    MINOR_UNITS_PER_UNIT, format_display, sum_balances, to_display_units, to_minor_units,
};
pub use contract::{ContractConfig, EntryPoint};
pub use error::ChainError;
pub use ledger::LedgerQuery;
pub use network::Network;
pub use rpc::SuiRpcClient;
pub use rpc_config::{RpcConfig, RpcConfigStore, validate_url};
pub use transaction::{Argument, CallArg, Command, PureValue, TransactionBlock};
pub use types::{Account, CoinRecord, ObjectDataOptions, ObjectRef, OwnedObject, TransactionReceipt};
pub use wallet::Wallet;
