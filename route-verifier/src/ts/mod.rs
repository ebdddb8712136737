//! Ticketing system gateway client.
//!
//! This module provides an HTTP client for the microservice ticketing
//! system's API gateway: route listing, trip queries for both service
//! classes, and the user, assurance, food, contact and reservation
//! endpoints used by the exploration commands.
//!
//! Key characteristics of the gateway:
//! - Responses are usually wrapped as `{status, msg, data}`, with
//!   `status == 1` meaning success, but some services return bare lists
//! - Authenticated endpoints take a bearer token from `users/login`

mod client;
mod error;
mod types;

pub use client::{LoginSession, TicketClient, TicketClientConfig};
pub use error::TsError;
pub use types::{
    Credentials, PreserveOrder, RawResponse, STATUS_SUCCESS, TripQuery, envelope_message,
    envelope_status, list_payload, order_id,
};
