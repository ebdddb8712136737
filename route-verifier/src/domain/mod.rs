//! Domain types for the route survey.
//!
//! Upstream route documents are loosely typed; this module normalizes them
//! into ordered station lists at the ingestion boundary and derives the
//! directed station pairs the survey probes.

mod pair;
mod route;
mod service_class;
mod station;

pub use pair::{generate_pairs, pairs_from_routes};
pub use route::{RouteRecord, extract_stations};
pub use service_class::ServiceClass;
pub use station::{StationId, StationPair};
