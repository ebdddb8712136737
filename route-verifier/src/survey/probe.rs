//! Connectivity probes against the trip-query services.

use std::fmt;
use std::future::Future;

use chrono::NaiveDate;
use serde_json::Value;

use crate::domain::{ServiceClass, StationPair};
use crate::ts::{RawResponse, TicketClient, TripQuery, list_payload};

/// What a single trip query told us.
///
/// Only [`ProbeOutcome::HasTrips`] counts as connectivity; every other
/// variant reads as "no trips" in the generated tables. The variants stay
/// distinct so the run summary can tell an unreachable service from a
/// genuinely unserved pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The service listed this many trips (always > 0).
    HasTrips(usize),
    /// The service answered with an empty list.
    NoTrips,
    /// The query ran out of time.
    Timeout,
    /// The request failed below HTTP (refused, reset, DNS, ...).
    Transport(String),
    /// The service answered with a status other than 200.
    Non200(u16),
    /// The body was not JSON or not a trip list.
    Malformed(String),
}

impl ProbeOutcome {
    /// Collapse to the boolean the tables record.
    pub fn has_trips(&self) -> bool {
        matches!(self, ProbeOutcome::HasTrips(_))
    }

    /// True when the query itself failed, as opposed to answering.
    pub fn is_failure(&self) -> bool {
        !matches!(self, ProbeOutcome::HasTrips(_) | ProbeOutcome::NoTrips)
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeOutcome::HasTrips(n) => write!(f, "{n} trips"),
            ProbeOutcome::NoTrips => write!(f, "no trips"),
            ProbeOutcome::Timeout => write!(f, "timed out"),
            ProbeOutcome::Transport(msg) => write!(f, "transport error: {msg}"),
            ProbeOutcome::Non200(status) => write!(f, "status {status}"),
            ProbeOutcome::Malformed(msg) => write!(f, "malformed response: {msg}"),
        }
    }
}

/// Trait for probing whether a service class runs trips between two stations.
///
/// This abstraction allows the survey to be tested without a live gateway.
pub trait TripProber {
    /// Probe one pair on one date for one service class.
    ///
    /// Never fails: problems are reported through the outcome.
    fn probe(
        &self,
        pair: &StationPair,
        date: NaiveDate,
        class: ServiceClass,
    ) -> impl Future<Output = ProbeOutcome>;
}

impl TripProber for TicketClient {
    async fn probe(&self, pair: &StationPair, date: NaiveDate, class: ServiceClass) -> ProbeOutcome {
        let query = TripQuery {
            start_place: pair.origin.as_str().to_string(),
            end_place: pair.destination.as_str().to_string(),
            departure_time: date.format("%Y-%m-%d").to_string(),
        };

        match self.trips_left(class, &query).await {
            Ok(response) => classify_trips(&response),
            Err(e) if e.is_timeout() => ProbeOutcome::Timeout,
            Err(e) => ProbeOutcome::Transport(e.to_string()),
        }
    }
}

/// Classify a `trips/left` response.
///
/// Status must be exactly 200. The body may be a bare list of trips or an
/// envelope whose `data` is one; an envelope without `data` means no trips.
pub fn classify_trips(response: &RawResponse) -> ProbeOutcome {
    if !response.is_ok() {
        return ProbeOutcome::Non200(response.status);
    }

    let body: Value = match serde_json::from_str(&response.body) {
        Ok(body) => body,
        Err(e) => return ProbeOutcome::Malformed(e.to_string()),
    };

    match list_payload(&body) {
        Some([]) => ProbeOutcome::NoTrips,
        Some(trips) => ProbeOutcome::HasTrips(trips.len()),
        None => ProbeOutcome::Malformed("trip payload is not a list".to_string()),
    }
}
