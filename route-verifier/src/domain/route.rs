//! Station extraction from upstream route documents.
//!
//! The route service has changed its response shape over time, so a route
//! may list its stations under one of several keys, as plain strings or as
//! objects, or only carry its two terminal stations. Each alias list below
//! is tried in order and the first truthy value wins.

use serde_json::{Map, Value};
use tracing::debug;

use super::station::StationId;

/// Keys that may hold the ordered station collection.
const STATION_LIST_KEYS: &[&str] = &["stations", "stationList", "stationIds"];

/// Keys that may hold a station's name inside a station object.
const STATION_NAME_KEYS: &[&str] = &["name", "stationName", "station", "id"];

/// Keys that may hold the first station of a route.
const START_STATION_KEYS: &[&str] = &["startStationName", "startStation", "startStationId"];

/// Keys that may hold the last station of a route.
const END_STATION_KEYS: &[&str] = &["endStationName", "endStation", "endStationId"];

/// A route normalized to its ordered list of stations.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouteRecord {
    pub stations: Vec<StationId>,
}

impl RouteRecord {
    /// Normalize one raw route document.
    ///
    /// Never fails: a document that is not an object, or whose fields are
    /// missing or malformed, yields a route with no stations.
    pub fn from_json(value: &Value) -> Self {
        let Some(doc) = value.as_object() else {
            debug!("skipping non-object route document");
            return Self::default();
        };

        let mut stations = listed_stations(doc);

        if stations.is_empty() {
            let start = first_truthy(doc, START_STATION_KEYS).and_then(StationId::from_json);
            let end = first_truthy(doc, END_STATION_KEYS).and_then(StationId::from_json);
            if let (Some(start), Some(end)) = (start, end) {
                stations = vec![start, end];
            }
        }

        Self { stations }
    }

    /// A route needs at least two stations to imply any reachability.
    pub fn is_usable(&self) -> bool {
        self.stations.len() >= 2
    }
}

/// Extract the ordered station list from a route document, if present.
///
/// String entries are kept as they are, empty ones included. Objects
/// without a usable name and any other entries are skipped.
pub fn extract_stations(route: &Value) -> Vec<StationId> {
    RouteRecord::from_json(route).stations
}

fn listed_stations(doc: &Map<String, Value>) -> Vec<StationId> {
    let Some(Value::Array(entries)) = first_truthy(doc, STATION_LIST_KEYS) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| match entry {
            Value::Object(station) => {
                first_truthy(station, STATION_NAME_KEYS).and_then(StationId::from_json)
            }
            Value::String(name) => Some(StationId::new(name.as_str())),
            _ => None,
        })
        .collect()
}

/// Return the value under the first key whose value is truthy.
fn first_truthy<'a>(doc: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| doc.get(*key))
        .find(|value| is_truthy(value))
}

/// Null, `false`, zero and empty strings/arrays/objects count as absent.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Station objects come back in input order.
        #[test]
        fn names_preserve_order(names in prop::collection::vec("[a-z]{1,12}", 0..12)) {
            let entries: Vec<Value> = names
                .iter()
                .map(|n| serde_json::json!({ "name": n }))
                .collect();
            let route = serde_json::json!({ "stations": entries });

            let extracted: Vec<String> = extract_stations(&route)
                .into_iter()
                .map(|s| s.as_str().to_string())
                .collect();

            prop_assert_eq!(extracted, names);
        }

        /// Numeric ids are coerced to their decimal form.
        #[test]
        fn numeric_ids_coerced(ids in prop::collection::vec(1u32..100_000, 1..8)) {
            let entries: Vec<Value> = ids.iter().map(|n| serde_json::json!({ "id": n })).collect();
            let route = serde_json::json!({ "stationIds": entries });

            let extracted: Vec<String> = extract_stations(&route)
                .into_iter()
                .map(|s| s.as_str().to_string())
                .collect();
            let expected: Vec<String> = ids.iter().map(|n| n.to_string()).collect();

            prop_assert_eq!(extracted, expected);
        }

        /// Terminal fallback always yields exactly [start, end].
        #[test]
        fn terminal_fallback(start in "[a-z]{1,10}", end in "[a-z]{1,10}") {
            let route = serde_json::json!({ "startStation": start, "endStation": end });
            let extracted = extract_stations(&route);

            prop_assert_eq!(extracted, vec![StationId::new(start), StationId::new(end)]);
        }
    }
}
