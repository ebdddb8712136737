//! Folding probe outcomes into route tables.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::domain::{ServiceClass, StationId, StationPair};

use super::probe::{ProbeOutcome, TripProber};

/// Origin → destination → presence, for one service class.
///
/// Sorted maps, so iteration order is the rendering order.
pub type AdjacencyTable = BTreeMap<StationId, BTreeMap<StationId, bool>>;

/// The two adjacency tables built during a survey.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTables {
    pub high_speed: AdjacencyTable,
    pub normal: AdjacencyTable,
}

impl RouteTables {
    /// Create empty tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `class` serves `pair`.
    pub fn mark(&mut self, class: ServiceClass, pair: &StationPair) {
        self.table_mut(class)
            .entry(pair.origin.clone())
            .or_default()
            .insert(pair.destination.clone(), true);
    }

    /// Whether `class` is recorded as serving `origin → destination`.
    pub fn contains(&self, class: ServiceClass, origin: &str, destination: &str) -> bool {
        self.table(class)
            .get(&StationId::new(origin))
            .and_then(|dests| dests.get(&StationId::new(destination)))
            .copied()
            .unwrap_or(false)
    }

    /// The table for one class.
    pub fn table(&self, class: ServiceClass) -> &AdjacencyTable {
        match class {
            ServiceClass::HighSpeed => &self.high_speed,
            ServiceClass::Normal => &self.normal,
        }
    }

    fn table_mut(&mut self, class: ServiceClass) -> &mut AdjacencyTable {
        match class {
            ServiceClass::HighSpeed => &mut self.high_speed,
            ServiceClass::Normal => &mut self.normal,
        }
    }

    /// Number of served pairs recorded for one class.
    pub fn count(&self, class: ServiceClass) -> usize {
        self.table(class)
            .values()
            .map(|dests| dests.values().filter(|present| **present).count())
            .sum()
    }
}

/// Tally of probe outcomes over a survey.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProbeStats {
    pub pairs: usize,
    pub probes: usize,
    pub has_trips: usize,
    pub no_trips: usize,
    pub timeouts: usize,
    pub transport_errors: usize,
    pub non_200: usize,
    pub malformed: usize,
}

impl ProbeStats {
    fn record(&mut self, outcome: &ProbeOutcome) {
        self.probes += 1;
        match outcome {
            ProbeOutcome::HasTrips(_) => self.has_trips += 1,
            ProbeOutcome::NoTrips => self.no_trips += 1,
            ProbeOutcome::Timeout => self.timeouts += 1,
            ProbeOutcome::Transport(_) => self.transport_errors += 1,
            ProbeOutcome::Non200(_) => self.non_200 += 1,
            ProbeOutcome::Malformed(_) => self.malformed += 1,
        }
    }

    /// Probes that failed rather than answered.
    pub fn failures(&self) -> usize {
        self.timeouts + self.transport_errors + self.non_200 + self.malformed
    }
}

/// Result of a survey: the tables plus outcome counts.
#[derive(Debug, Clone, Default)]
pub struct SurveyResult {
    pub tables: RouteTables,
    pub stats: ProbeStats,
}

/// Probes every candidate pair for both service classes.
pub struct Surveyor<'a, P> {
    prober: &'a P,
}

impl<'a, P: TripProber> Surveyor<'a, P> {
    /// Create a surveyor over the given prober.
    pub fn new(prober: &'a P) -> Self {
        Self { prober }
    }

    /// Probe each pair, in sorted order, once per service class.
    ///
    /// Probes run one at a time. Failed probes count as "no trips" and
    /// never abort the survey.
    pub async fn survey(&self, pairs: &BTreeSet<StationPair>, date: NaiveDate) -> SurveyResult {
        let mut tables = RouteTables::new();
        let mut stats = ProbeStats {
            pairs: pairs.len(),
            ..ProbeStats::default()
        };
        let total = pairs.len();

        for (idx, pair) in pairs.iter().enumerate() {
            let mut served = Vec::new();

            for class in ServiceClass::ALL {
                let outcome = self.prober.probe(pair, date, class).await;
                stats.record(&outcome);

                if outcome.is_failure() {
                    warn!(%pair, %class, %outcome, "probe failed");
                }
                if outcome.has_trips() {
                    tables.mark(class, pair);
                    served.push(class.tag());
                }
            }

            let verdict = if served.is_empty() {
                "no trips".to_string()
            } else {
                served.join(" + ")
            };
            info!("[{}/{}] {}: {}", idx + 1, total, pair, verdict);
        }

        SurveyResult { tables, stats }
    }
}
