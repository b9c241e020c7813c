//! JSON-RPC ledger client for Sui full nodes.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::error::ChainError;
use crate::ledger::LedgerQuery;
use crate::rpc_config::RpcConfig;
use crate::types::{CoinRecord, ObjectDataOptions, OwnedObject};

const DEFAULT_PAGE_LIMIT: usize = 50;

// ---------------------------------------------------------------------------
// Wire types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Page<T> {
    data: Vec<T>,
    next_cursor: Option<Value>,
    #[serde(default)]
    has_next_page: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCoin {
    coin_object_id: String,
    #[serde(deserialize_with = "u64_from_string_or_number")]
    balance: u64,
    digest: String,
    #[serde(deserialize_with = "u64_from_string_or_number")]
    version: u64,
}

#[derive(Debug, Deserialize)]
struct WireObjectResponse {
    data: Option<WireObjectData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireObjectData {
    object_id: String,
    #[serde(deserialize_with = "u64_from_string_or_number")]
    version: u64,
    digest: String,
    #[serde(rename = "type")]
    object_type: Option<String>,
    content: Option<WireContent>,
}

#[derive(Debug, Deserialize)]
struct WireContent {
    #[serde(default)]
    fields: Value,
}

fn u64_from_string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    match Value::deserialize(d)? {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| serde::de::Error::custom(format!("not a u64: {n}"))),
        Value::String(s) => s.parse().map_err(serde::de::Error::custom),
        other => Err(serde::de::Error::custom(format!(
            "expected u64 string or number, got {other}"
        ))),
    }
}

impl From<WireCoin> for CoinRecord {
    fn from(coin: WireCoin) -> Self {
        Self {
            coin_object_id: coin.coin_object_id,
            balance: coin.balance,
            digest: coin.digest,
            version: coin.version,
        }
    }
}

impl From<WireObjectData> for OwnedObject {
    fn from(data: WireObjectData) -> Self {
        Self {
            object_id: data.object_id,
            version: data.version,
            digest: data.digest,
            object_type: data.object_type,
            fields: data.content.map(|c| c.fields).unwrap_or(Value::Null),
        }
    }
}

/// Unwrap a JSON-RPC envelope into its result or the node's error.
fn parse_envelope<T: DeserializeOwned>(body: Value) -> Result<T, ChainError> {
    let response: RpcResponse<T> = serde_json::from_value(body)?;
    if let Some(err) = response.error {
        return Err(ChainError::Rpc {
            code: err.code,
            message: err.message,
        });
    }
    response
        .result
        .ok_or_else(|| ChainError::Decode("response has neither result nor error".into()))
}

/// Keep entries that carry object data; the node reports deleted or
/// inaccessible objects with an `error` member instead.
fn collect_objects(entries: Vec<WireObjectResponse>) -> Vec<OwnedObject> {
    entries
        .into_iter()
        .filter_map(|entry| match entry.data {
            Some(data) => Some(OwnedObject::from(data)),
            None => {
                debug!("skipping owned-object entry without data");
                None
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Ledger query client speaking Sui's JSON-RPC 2.0 API over HTTP.
///
/// Paginated queries follow `nextCursor` until the node reports no further
/// pages, so callers always see the complete owner set.
pub struct SuiRpcClient {
    url: String,
    client: reqwest::Client,
    page_limit: usize,
    next_id: AtomicU64,
}

impl SuiRpcClient {
    /// Create a client for a raw endpoint URL with reqwest's default timeout.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
            page_limit: DEFAULT_PAGE_LIMIT,
            next_id: AtomicU64::new(1),
        }
    }

    /// Create a client from an endpoint configuration, applying its timeout.
    pub fn from_rpc_config(config: &RpcConfig) -> Result<Self, ChainError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            url: config.url.clone(),
            client,
            page_limit: DEFAULT_PAGE_LIMIT,
            next_id: AtomicU64::new(1),
        })
    }

    /// Override the per-request page size. Zero falls back to the default.
    pub fn with_page_limit(mut self, limit: usize) -> Self {
        self.page_limit = if limit == 0 { DEFAULT_PAGE_LIMIT } else { limit };
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, ChainError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let payload = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        debug!(url = %self.url, method, id, "sending RPC request");

        let response = self.client.post(&self.url).json(&payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await?;
            // Some nodes pair a JSON-RPC error object with a non-2xx status.
            return match serde_json::from_str::<Value>(&text) {
                Ok(body) if body.get("error").is_some() => parse_envelope(body),
                _ => {
                    warn!(method, %status, "RPC endpoint returned HTTP error");
                    Err(ChainError::Transport(format!("HTTP {status}: {text}")))
                }
            };
        }

        let body: Value = response.json().await?;
        parse_envelope(body)
    }

    /// Fetch every page of a cursor-paginated method. `params` builds the
    /// parameter list for a given cursor.
    async fn paginate<T, F>(&self, method: &str, params: F) -> Result<Vec<T>, ChainError>
    where
        T: DeserializeOwned,
        F: Fn(Value) -> Value,
    {
        let mut items = Vec::new();
        let mut cursor = Value::Null;
        loop {
            let page: Page<T> = self.call(method, params(cursor)).await?;
            items.extend(page.data);
            match page.next_cursor {
                Some(next) if page.has_next_page && !next.is_null() => cursor = next,
                _ => break,
            }
        }
        Ok(items)
    }
}

#[async_trait]
impl LedgerQuery for SuiRpcClient {
    async fn get_coins(&self, owner: &str, coin_type: &str) -> Result<Vec<CoinRecord>, ChainError> {
        let limit = self.page_limit;
        let coins: Vec<WireCoin> = self
            .paginate("suix_getCoins", |cursor| {
                json!([owner, coin_type, cursor, limit])
            })
            .await?;
        debug!(owner, coin_type, count = coins.len(), "fetched coins");
        Ok(coins.into_iter().map(CoinRecord::from).collect())
    }

    async fn get_owned_objects(
        &self,
        owner: &str,
        struct_type: &str,
        options: ObjectDataOptions,
    ) -> Result<Vec<OwnedObject>, ChainError> {
        let limit = self.page_limit;
        let query = json!({
            "filter": { "MatchAll": [ { "StructType": struct_type } ] },
            "options": options,
        });
        let entries: Vec<WireObjectResponse> = self
            .paginate("suix_getOwnedObjects", |cursor| {
                json!([owner, query, cursor, limit])
            })
            .await?;
        let objects = collect_objects(entries);
        debug!(owner, struct_type, count = objects.len(), "fetched owned objects");
        Ok(objects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::sum_balances;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::sync::mpsc;

    #[test]
    fn parses_coin_page() {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {
                "data": [
                    {
                        "coinType": "0x2::sui::SUI",
                        "coinObjectId": "0xc1",
                        "version": "17",
                        "digest": "Dg1",
                        "balance": "1500000000",
                        "previousTransaction": "Tx"
                    }
                ],
                "nextCursor": "0xc1",
                "hasNextPage": false
            }
        });
        let page: Page<WireCoin> = parse_envelope(body).unwrap();
        assert!(!page.has_next_page);
        let coins: Vec<CoinRecord> = page.data.into_iter().map(CoinRecord::from).collect();
        assert_eq!(coins.len(), 1);
        assert_eq!(coins[0].coin_object_id, "0xc1");
        assert_eq!(coins[0].balance, 1_500_000_000);
        assert_eq!(coins[0].version, 17);
    }

    #[test]
    fn rpc_error_object_becomes_chain_error() {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32602, "message": "Invalid params" }
        });
        let err = parse_envelope::<Page<WireCoin>>(body).unwrap_err();
        assert!(matches!(err, ChainError::Rpc { code: -32602, ref message } if message == "Invalid params"));
    }

    #[test]
    fn empty_envelope_is_decode_error() {
        let err = parse_envelope::<Value>(json!({ "jsonrpc": "2.0", "id": 1 })).unwrap_err();
        assert!(matches!(err, ChainError::Decode(_)));
    }

    #[test]
    fn malformed_balance_is_rejected() {
        let body = json!({
            "result": {
                "data": [{ "coinObjectId": "0x1", "version": "1", "digest": "d", "balance": "lots" }],
                "nextCursor": null,
                "hasNextPage": false
            }
        });
        assert!(parse_envelope::<Page<WireCoin>>(body).is_err());
    }

    #[test]
    fn owned_objects_keep_fields_and_drop_missing_data() {
        let body = json!({
            "result": {
                "data": [
                    {
                        "data": {
                            "objectId": "0xs1",
                            "version": "5",
                            "digest": "Ds",
                            "type": "0xpkg::launchpad::StakeInfo",
                            "content": {
                                "dataType": "moveObject",
                                "type": "0xpkg::launchpad::StakeInfo",
                                "hasPublicTransfer": true,
                                "fields": { "amount": "2000000000", "last_update_time": "1700000000000" }
                            }
                        }
                    },
                    { "error": { "code": "deleted", "object_id": "0xgone" } }
                ],
                "nextCursor": null,
                "hasNextPage": false
            }
        });
        let page: Page<WireObjectResponse> = parse_envelope(body).unwrap();
        let objects = collect_objects(page.data);

        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].object_id, "0xs1");
        assert_eq!(objects[0].object_type.as_deref(), Some("0xpkg::launchpad::StakeInfo"));
        assert_eq!(objects[0].u64_field("amount"), Some(2_000_000_000));
    }

    #[test]
    fn object_without_content_has_null_fields() {
        let body = json!({
            "result": {
                "data": [{ "data": { "objectId": "0x1", "version": 2, "digest": "d" } }],
                "nextCursor": null,
                "hasNextPage": false
            }
        });
        let page: Page<WireObjectResponse> = parse_envelope(body).unwrap();
        let objects = collect_objects(page.data);
        assert_eq!(objects[0].fields, Value::Null);
        assert_eq!(objects[0].object_type, None);
    }

    #[test]
    fn page_limit_zero_uses_default() {
        let client = SuiRpcClient::new("http://127.0.0.1:9000").with_page_limit(0);
        assert_eq!(client.page_limit, DEFAULT_PAGE_LIMIT);
        assert_eq!(client.url(), "http://127.0.0.1:9000");
    }

    // -- Local node --------------------------------------------------------

    /// Serve one canned HTTP response per connection, in order, and forward
    /// each request's JSON body to the returned channel.
    async fn serve(
        responses: Vec<(&'static str, String)>,
    ) -> (String, mpsc::UnboundedReceiver<Value>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            for (status_line, body) in responses {
                let (mut stream, _) = listener.accept().await.unwrap();
                let request = read_request_body(&mut stream).await;
                let _ = tx.send(serde_json::from_slice(&request).unwrap_or(Value::Null));

                let response = format!(
                    "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                stream.write_all(response.as_bytes()).await.unwrap();
                stream.shutdown().await.unwrap();
            }
        });

        (url, rx)
    }

    async fn read_request_body(stream: &mut TcpStream) -> Vec<u8> {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        let header_end = loop {
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before headers");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let headers = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
        let content_length: usize = headers
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(0);

        while buf.len() < header_end + content_length {
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before body");
            buf.extend_from_slice(&chunk[..n]);
        }
        buf[header_end..header_end + content_length].to_vec()
    }

    fn coin_page(ids: &[&str], next_cursor: Option<&str>, has_next_page: bool) -> String {
        let data: Vec<Value> = ids
            .iter()
            .map(|id| {
                json!({
                    "coinType": "0x2::sui::SUI",
                    "coinObjectId": id,
                    "version": "3",
                    "digest": "D",
                    "balance": "1000000000"
                })
            })
            .collect();
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": { "data": data, "nextCursor": next_cursor, "hasNextPage": has_next_page }
        })
        .to_string()
    }

    #[tokio::test]
    async fn get_coins_follows_cursor_across_pages() {
        let (url, mut requests) = serve(vec![
            ("200 OK", coin_page(&["0x1"], Some("0x1"), true)),
            ("200 OK", coin_page(&["0x2"], Some("0x2"), false)),
        ])
        .await;
        let client = SuiRpcClient::new(url).with_page_limit(1);

        let coins = client.get_coins("0xowner", "0x2::sui::SUI").await.unwrap();
        let ids: Vec<&str> = coins.iter().map(|c| c.coin_object_id.as_str()).collect();
        assert_eq!(ids, vec!["0x1", "0x2"]);
        assert_eq!(sum_balances(&coins), 2_000_000_000);

        let first = requests.recv().await.unwrap();
        assert_eq!(first["method"], "suix_getCoins");
        assert_eq!(first["params"], json!(["0xowner", "0x2::sui::SUI", null, 1]));

        let second = requests.recv().await.unwrap();
        assert_eq!(second["params"], json!(["0xowner", "0x2::sui::SUI", "0x1", 1]));
        assert_ne!(first["id"], second["id"]);
    }

    #[tokio::test]
    async fn get_owned_objects_sends_struct_filter_and_limit() {
        let page = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": { "data": [], "nextCursor": null, "hasNextPage": false }
        })
        .to_string();
        let (url, mut requests) = serve(vec![("200 OK", page)]).await;
        let client = SuiRpcClient::new(url).with_page_limit(25);

        let objects = client
            .get_owned_objects(
                "0xowner",
                "0xpkg::launchpad::StakeInfo",
                ObjectDataOptions::content_and_type(),
            )
            .await
            .unwrap();
        assert!(objects.is_empty());

        let request = requests.recv().await.unwrap();
        assert_eq!(request["method"], "suix_getOwnedObjects");
        let params = &request["params"];
        assert_eq!(params[0], "0xowner");
        assert_eq!(
            params[1]["filter"]["MatchAll"][0]["StructType"],
            "0xpkg::launchpad::StakeInfo"
        );
        assert_eq!(params[1]["options"]["showContent"], true);
        assert_eq!(params[2], Value::Null);
        assert_eq!(params[3], 25);
    }

    #[tokio::test]
    async fn non_json_http_error_keeps_status() {
        let (url, _requests) =
            serve(vec![("503 Service Unavailable", "Service Unavailable".into())]).await;
        let client = SuiRpcClient::new(url);

        let err = client.get_coins("0xowner", "0x2::sui::SUI").await.unwrap_err();
        match err {
            ChainError::Transport(message) => {
                assert!(message.contains("503"), "status missing: {message}");
                assert!(message.contains("Service Unavailable"));
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn json_rpc_error_with_http_error_status_is_rpc_error() {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32000, "message": "overloaded" }
        })
        .to_string();
        let (url, _requests) = serve(vec![("500 Internal Server Error", body)]).await;
        let client = SuiRpcClient::new(url);

        let err = client.get_coins("0xowner", "0x2::sui::SUI").await.unwrap_err();
        assert!(matches!(
            err,
            ChainError::Rpc { code: -32000, ref message } if message == "overloaded"
        ));
    }

    #[tokio::test]
    async fn unreachable_node_is_transport_error() {
        // Port 9 (discard) is closed on test hosts; the connect fails fast.
        let client = SuiRpcClient::new("http://127.0.0.1:9");
        let err = client.get_coins("0xowner", "0x2::sui::SUI").await.unwrap_err();
        assert!(matches!(err, ChainError::Transport(_)));
    }
}
