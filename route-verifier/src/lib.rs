//! Route verification and API exploration for a microservice ticketing system.
//!
//! Derives which station pairs the high-speed and normal train services
//! actually serve by probing the live trip-query endpoints, and offers
//! one-shot calls against the other gateway endpoints.

pub mod domain;
pub mod explore;
pub mod survey;
pub mod ts;

#[cfg(test)]
mod test_support;
