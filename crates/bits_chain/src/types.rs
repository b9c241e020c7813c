use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A connected wallet account, identified by its hex address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Account {
    pub address: String,
}

impl Account {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }
}

/// One coin object of a given coin type owned by an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinRecord {
    pub coin_object_id: String,
    /// Balance in minor units.
    pub balance: u64,
    pub digest: String,
    pub version: u64,
}

impl CoinRecord {
    /// Reference used to name this coin as gas payment.
    pub fn object_ref(&self) -> ObjectRef {
        ObjectRef {
            object_id: self.coin_object_id.clone(),
            version: self.version,
            digest: self.digest.clone(),
        }
    }
}

/// Fully-qualified reference to a specific version of an owned object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRef {
    pub object_id: String,
    pub version: u64,
    pub digest: String,
}

/// Which parts of an object the node should include in query results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectDataOptions {
    pub show_content: bool,
    pub show_type: bool,
}

impl ObjectDataOptions {
    pub fn content_and_type() -> Self {
        Self {
            show_content: true,
            show_type: true,
        }
    }
}

/// An object returned by an owned-objects query.
///
/// `fields` holds the Move struct's field map when content was requested, or
/// `Value::Null` otherwise. Field values follow the node's JSON encoding:
/// `u64` and larger integers arrive as strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnedObject {
    pub object_id: String,
    pub version: u64,
    pub digest: String,
    pub object_type: Option<String>,
    pub fields: Value,
}

impl OwnedObject {
    /// Read an unsigned integer field, accepting either a JSON number or a
    /// decimal string.
    pub fn u64_field(&self, name: &str) -> Option<u64> {
        match self.fields.get(name)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}

/// Outcome of a signed and executed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub digest: String,
    /// Execution status reported by the node, when the wallet surfaces it.
    #[serde(default)]
    pub status: Option<String>,
}
