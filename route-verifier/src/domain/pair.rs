//! Candidate station pairs from route orderings.
//!
//! A route's station order implies reachability in that direction only, so
//! every earlier station is paired with every later one and never the
//! reverse.

use std::collections::BTreeSet;

use serde_json::Value;
use tracing::debug;

use super::route::RouteRecord;
use super::station::{StationId, StationPair};

/// All `(stations[i], stations[j])` with `i < j`.
///
/// Returns an empty set for fewer than two stations.
pub fn generate_pairs(stations: &[StationId]) -> BTreeSet<StationPair> {
    let mut pairs = BTreeSet::new();
    for (i, origin) in stations.iter().enumerate() {
        for destination in &stations[i + 1..] {
            pairs.insert(StationPair::new(origin.clone(), destination.clone()));
        }
    }
    pairs
}

/// Union of the pairs implied by every route document.
///
/// Routes with fewer than two usable stations contribute nothing.
pub fn pairs_from_routes(routes: &[Value]) -> BTreeSet<StationPair> {
    let mut all = BTreeSet::new();

    for (idx, raw) in routes.iter().enumerate() {
        let route = RouteRecord::from_json(raw);
        if !route.is_usable() {
            debug!(route = idx + 1, "route contributes no stations");
            continue;
        }

        let pairs = generate_pairs(&route.stations);
        debug!(
            route = idx + 1,
            stations = route.stations.len(),
            pairs = pairs.len(),
            "extracted route"
        );
        all.extend(pairs);
    }

    all
}
