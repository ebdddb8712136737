//! Route survey.
//!
//! Derives the static routing table the load generator uses: every station
//! pair implied by the route service's station orderings is probed against
//! the high-speed and the normal trip-query services, and the pairs that
//! list trips are emitted as two adjacency tables.

mod aggregate;
mod config;
mod error;
mod probe;
mod report;
mod run;

#[cfg(test)]
mod http_tests;

pub use aggregate::{AdjacencyTable, ProbeStats, RouteTables, SurveyResult, Surveyor};
pub use config::{DEFAULT_OUTPUT_PATH, SurveyConfig};
pub use error::SurveyError;
pub use probe::{ProbeOutcome, TripProber, classify_trips};
pub use report::{render_config, write_config};
pub use run::{VerifyReport, verify_routes};
