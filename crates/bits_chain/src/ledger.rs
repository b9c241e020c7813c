use async_trait::async_trait;

use crate::error::ChainError;
use crate::types::{CoinRecord, ObjectDataOptions, OwnedObject};

/// Read access to ledger state.
///
/// Results are snapshots: callers re-query after every mutation instead of
/// patching previous results.
///
/// Stake records are plain Move objects and carry no lifecycle status. A
/// position that was unstaked either disappears from
/// [`LedgerQuery::get_owned_objects`] or still shows up unchanged, so status
/// can only be tracked client-side and is lost on every re-query.
#[async_trait]
pub trait LedgerQuery: Send + Sync {
    /// All coins of `coin_type` owned by `owner`, in the node's order.
    async fn get_coins(&self, owner: &str, coin_type: &str) -> Result<Vec<CoinRecord>, ChainError>;

    /// All objects owned by `owner` whose Move struct type equals
    /// `struct_type`. Entries the node reports without object data are
    /// omitted.
    async fn get_owned_objects(
        &self,
        owner: &str,
        struct_type: &str,
        options: ObjectDataOptions,
    ) -> Result<Vec<OwnedObject>, ChainError>;
}
