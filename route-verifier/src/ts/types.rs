//! Ticketing API request bodies and response helpers.
//!
//! Most services wrap their payload as `{"status": 1, "msg": "...", "data": ...}`,
//! but some return the payload bare. Response bodies are therefore kept as
//! `serde_json::Value` and normalized through the helpers here.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Envelope status meaning "success".
pub const STATUS_SUCCESS: i64 = 1;

/// Body of a `trips/left` query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripQuery {
    pub start_place: String,
    pub end_place: String,
    /// Departure date as `YYYY-MM-DD`.
    pub departure_time: String,
}

/// Body of `POST /api/v1/users/login`.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Body of a ticket reservation (`preserve` / `preserveOther`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreserveOrder {
    pub account_id: String,
    pub contacts_id: String,
    /// Train number, e.g. `D1345` or `Z1235`.
    pub trip_id: String,
    pub seat_type: String,
    /// Travel date as `YYYY-MM-DD`.
    pub date: String,
    pub from: String,
    pub to: String,
    /// Assurance type index; `"0"` buys none.
    pub assurance: String,
    /// Food type; `0` orders none.
    pub food_type: i32,
    pub station_name: String,
    pub store_name: String,
    pub food_name: String,
    pub food_price: f64,
}

/// A raw HTTP response, kept for display.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl RawResponse {
    /// True for HTTP 200 exactly.
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Decode the body as JSON, if it is JSON.
    pub fn json(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }
}

/// Extract the list payload from a response body.
///
/// Accepts a bare JSON array or an envelope whose `data` is an array. An
/// envelope without `data` counts as an empty list. Any other shape
/// returns `None`.
pub fn list_payload(value: &Value) -> Option<&[Value]> {
    const EMPTY: &[Value] = &[];

    match value {
        Value::Array(items) => Some(items.as_slice()),
        Value::Object(doc) => match doc.get("data") {
            None => Some(EMPTY),
            Some(Value::Array(items)) => Some(items.as_slice()),
            Some(_) => None,
        },
        _ => None,
    }
}

/// The envelope's `status` field, if any.
pub fn envelope_status(value: &Value) -> Option<i64> {
    value.get("status").and_then(Value::as_i64)
}

/// The envelope's `msg` field, if any.
pub fn envelope_message(value: &Value) -> Option<&str> {
    value.get("msg").and_then(Value::as_str)
}

/// Order id from a reservation response.
///
/// The preserve services report it as `data.id`, `data.orderId`, a bare
/// string in `data`, or at the top level.
pub fn order_id(value: &Value) -> Option<String> {
    const ID_KEYS: &[&str] = &["id", "orderId"];

    let found = match value.get("data") {
        Some(data @ Value::Object(_)) => first_str(data, ID_KEYS),
        Some(Value::String(s)) if !s.is_empty() => Some(s.as_str()),
        _ => first_str(value, ID_KEYS),
    };
    found.map(str::to_string)
}

/// First non-empty string among `keys` of a JSON object.
pub(crate) fn first_str<'a>(doc: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| doc.get(*key).and_then(Value::as_str))
        .find(|s| !s.is_empty())
}
