//! Soroban RPC client: polls `getEvents` and decodes FundMe events.
//!
//! ## Resilience
//!
//! * Exponential back-off is applied when the RPC returns an error or rate-limit
//!   response, up to [`MAX_BACKOFF_SECS`] seconds.
//! * Transient network errors (connection reset, timeout) are retried silently.
//! * Events from failed contract calls are dropped during decoding.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::errors::{IndexerError, Result};
use crate::events::{EventKind, FundMeEvent};

const MAX_BACKOFF_SECS: u64 = 60;
const INITIAL_BACKOFF_SECS: u64 = 2;

/// JSON-RPC codes that retrying cannot fix (invalid request, unknown method).
const HARD_ERROR_CODES: [i64; 2] = [-32600, -32601];

/// ScVal JSON tags whose payload is a single scalar.
const SCALAR_TAGS: [&str; 9] = [
    "symbol", "address", "string", "i128", "u128", "i64", "u64", "i32", "u32",
];

// ─────────────────────────────────────────────────────────
// JSON-RPC response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    pub result: Option<EventsResult>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct EventsResult {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    #[serde(rename = "latestLedger")]
    pub latest_ledger: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RawEvent {
    /// Topic list. ScVal JSON when requested with `xdrFormat: "json"`.
    #[serde(rename = "topicJson", alias = "topic", default)]
    pub topic: Vec<Value>,
    /// Event data. ScVal JSON when requested with `xdrFormat: "json"`.
    #[serde(rename = "valueJson", alias = "value", default)]
    pub value: Value,
    #[serde(rename = "contractId")]
    pub contract_id: Option<String>,
    #[serde(rename = "txHash")]
    pub tx_hash: Option<String>,
    pub id: Option<String>,
    pub ledger: Option<u64>,
    #[serde(rename = "ledgerClosedAt")]
    pub ledger_closed_at: Option<String>,
    #[serde(rename = "inSuccessfulContractCall")]
    pub in_successful_contract_call: Option<bool>,
}

/// One page of `getEvents` output.
#[derive(Debug)]
pub struct EventsPage {
    pub events: Vec<RawEvent>,
    /// Opaque cursor to continue from, if the RPC returned one.
    pub cursor: Option<String>,
    pub latest_ledger: Option<u64>,
}

// ─────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────

/// Fetch a page of events from the RPC.
///
/// * `start_ledger`: the ledger sequence to scan from (inclusive).
/// * `cursor`: optional opaque pagination cursor from a previous response.
/// * `limit`: maximum number of events to return.
pub async fn fetch_events(
    client: &Client,
    rpc_url: &str,
    contract_id: &str,
    start_ledger: u32,
    cursor: Option<&str>,
    limit: u32,
) -> Result<EventsPage> {
    let mut backoff = INITIAL_BACKOFF_SECS;
    let request = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "getEvents",
        "params": build_params(contract_id, start_ledger, cursor, limit),
    });

    loop {
        let response = match client.post(rpc_url).json(&request).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!("RPC request failed (will retry in {backoff}s): {e}");
                backoff = sleep_and_grow(backoff).await;
                continue;
            }
        };

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!("Rate-limited by RPC (will retry in {backoff}s)");
            backoff = sleep_and_grow(backoff).await;
            continue;
        }

        let text = response.text().await?;
        let body: RpcResponse = serde_json::from_str(&text)?;

        if let Some(err) = body.error {
            if HARD_ERROR_CODES.contains(&err.code) {
                return Err(IndexerError::EventParse(format!(
                    "RPC hard error {}: {}",
                    err.code, err.message
                )));
            }
            warn!(
                "RPC soft error (will retry in {backoff}s): {} {}",
                err.code, err.message
            );
            backoff = sleep_and_grow(backoff).await;
            continue;
        }

        let result = body.result.ok_or_else(|| {
            IndexerError::EventParse("Empty result from getEvents".to_string())
        })?;

        debug!(
            "Fetched {} events (latest_ledger={:?})",
            result.events.len(),
            result.latest_ledger
        );

        return Ok(EventsPage {
            events: result.events,
            cursor: result.cursor,
            latest_ledger: result.latest_ledger,
        });
    }
}

async fn sleep_and_grow(backoff: u64) -> u64 {
    tokio::time::sleep(Duration::from_secs(backoff)).await;
    next_backoff(backoff)
}

fn next_backoff(backoff: u64) -> u64 {
    (backoff * 2).min(MAX_BACKOFF_SECS)
}

fn build_params(contract_id: &str, start_ledger: u32, cursor: Option<&str>, limit: u32) -> Value {
    let mut params = json!({
        "filters": [
            {
                "type": "contract",
                "contractIds": [contract_id]
            }
        ],
        "pagination": {
            "limit": limit
        },
        "xdrFormat": "json"
    });

    if let Some(cur) = cursor {
        params["pagination"]["cursor"] = json!(cur);
    } else {
        params["startLedger"] = json!(start_ledger);
    }

    params
}

// ─────────────────────────────────────────────────────────
// Event decoding
// ─────────────────────────────────────────────────────────

/// Decode a list of raw RPC events into [`FundMeEvent`] structs.
pub fn decode_events(raw: &[RawEvent], contract_id: &str) -> Vec<FundMeEvent> {
    raw.iter()
        .filter(|e| e.in_successful_contract_call.unwrap_or(true))
        .filter_map(|e| decode_single(e, contract_id))
        .collect()
}

fn decode_single(raw: &RawEvent, contract_id: &str) -> Option<FundMeEvent> {
    let first_topic = raw.topic.first()?;
    let kind = EventKind::from_topic(&scalar(first_topic).unwrap_or_default());

    let timestamp = raw
        .ledger_closed_at
        .as_deref()
        .and_then(parse_iso_to_unix)
        .unwrap_or(0);

    // The second topic is the funder / owner address.
    let topic_actor = raw.topic.get(1).and_then(scalar);
    let (actor, amount, funders) = decode_data(&raw.value, &kind);

    if kind != EventKind::Unknown && amount.is_none() {
        warn!(
            "{} event {:?} carries no readable amount",
            kind.as_str(),
            raw.id
        );
    }

    Some(FundMeEvent {
        event_type: kind.as_str().to_string(),
        actor: actor.or(topic_actor),
        amount,
        funders,
        ledger: raw.ledger.unwrap_or(0) as i64,
        timestamp,
        contract_id: raw
            .contract_id
            .clone()
            .unwrap_or_else(|| contract_id.to_string()),
        tx_hash: raw.tx_hash.clone(),
        event_id: raw.id.clone(),
    })
}

/// Pull the fields of a ledger event out of its data payload.
fn decode_data(value: &Value, kind: &EventKind) -> (Option<String>, Option<String>, Option<i64>) {
    match kind {
        EventKind::Funded => (
            field(value, &["funder", "address"]),
            field(value, &["amount"]),
            None,
        ),
        EventKind::Withdrawn => (
            field(value, &["owner", "address"]),
            field(value, &["amount"]),
            field(value, &["funders"]).and_then(|f| f.parse().ok()),
        ),
        EventKind::Unknown => (None, None, None),
    }
}

/// First of `keys` present in `value`, rendered as a string.
///
/// Accepts an ScVal map (`{"map":[{"key":…,"val":…}]}`) or a plain JSON object.
fn field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match value.get("map") {
        Some(Value::Array(entries)) => entries
            .iter()
            .find(|entry| entry.get("key").and_then(scalar).as_deref() == Some(*key))
            .and_then(|entry| entry.get("val"))
            .and_then(scalar),
        _ => value.get(*key).and_then(scalar),
    })
}

/// Render a scalar ScVal as a string.
///
/// Understands the RPC's JSON XDR form (`{"symbol":"funded"}`,
/// `{"i128":"100"}`), the older `{"type":…, "value":…}` form, bare JSON
/// scalars, and either object form encoded as a string.
fn scalar(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(inner @ Value::Object(_)) => scalar(&inner),
            _ => Some(s.clone()),
        },
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => {
            if let Some(inner) = map.get("value") {
                return scalar(inner);
            }
            let (tag, inner) = map.iter().next()?;
            if map.len() != 1 || !SCALAR_TAGS.contains(&tag.as_str()) {
                return None;
            }
            match (inner.get("hi"), inner.get("lo")) {
                (Some(hi), Some(lo)) => join_parts(hi, lo),
                _ => scalar(inner),
            }
        }
        _ => None,
    }
}

/// Rebuild a 128-bit integer from its `{"hi":…, "lo":…}` halves.
fn join_parts(hi: &Value, lo: &Value) -> Option<String> {
    let lo = lo.as_u64()?;
    match hi.as_i64() {
        Some(hi) => Some((((hi as i128) << 64) | lo as i128).to_string()),
        None => Some((((hi.as_u64()? as u128) << 64) | lo as u128).to_string()),
    }
}

/// Parse an ISO-8601 timestamp string into a Unix epoch (seconds).
fn parse_iso_to_unix(s: &str) -> Option<i64> {
    chrono::DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.timestamp())
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
