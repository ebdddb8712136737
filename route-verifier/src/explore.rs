//! Exploration commands: single endpoint calls with light response reading.
//!
//! These calls have no shared workflow beyond logging in first. The only
//! multi-step flow is a reservation, which needs the account id from the
//! login and a contact of that account before it can place the order.

use serde_json::Value;
use tracing::{info, warn};

use crate::domain::ServiceClass;
use crate::ts::{
    Credentials, PreserveOrder, RawResponse, STATUS_SUCCESS, TicketClient, TsError,
    envelope_message, envelope_status, list_payload, order_id,
};

/// Number of items in a list response, when it is one.
pub fn count_items(response: &RawResponse) -> Option<usize> {
    if !response.is_ok() {
        return None;
    }
    let body = response.json()?;
    list_payload(&body).map(<[Value]>::len)
}

/// A contact as listed by the contact service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// Contacts from a contact-service response; empty unless it is a 200 list.
pub fn contacts_list(response: &RawResponse) -> Vec<Contact> {
    let Some(body) = response.json().filter(|_| response.is_ok()) else {
        return Vec::new();
    };

    list_payload(&body)
        .unwrap_or_default()
        .iter()
        .map(|c| Contact {
            id: text_field(c, "id"),
            name: text_field(c, "name"),
        })
        .collect()
}

fn text_field(doc: &Value, key: &str) -> Option<String> {
    doc.get(key)
        .filter(|v| !v.is_null())
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
}

/// Trip and extras of a reservation; account and contact are resolved at
/// reservation time.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDetails {
    pub trip_id: String,
    pub seat_type: String,
    pub date: String,
    pub from: String,
    pub to: String,
    pub assurance: String,
    pub food_type: i32,
    pub station_name: String,
    pub store_name: String,
    pub food_name: String,
    pub food_price: f64,
}

impl OrderDetails {
    fn into_order(self, account_id: String, contacts_id: String) -> PreserveOrder {
        PreserveOrder {
            account_id,
            contacts_id,
            trip_id: self.trip_id,
            seat_type: self.seat_type,
            date: self.date,
            from: self.from,
            to: self.to,
            assurance: self.assurance,
            food_type: self.food_type,
            station_name: self.station_name,
            store_name: self.store_name,
            food_name: self.food_name,
            food_price: self.food_price,
        }
    }
}

/// Ids used when the services cannot supply them.
#[derive(Debug, Clone, Default)]
pub struct ReservationFallbacks {
    pub account_id: Option<String>,
    pub contacts_id: Option<String>,
}

/// How the reservation service answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReservationOutcome {
    /// `status == 1`; the order id when reported.
    Reserved { order_id: Option<String> },
    /// The service refused the order.
    Rejected { message: String },
    /// The body could not be read as an envelope.
    Unreadable,
}

/// A placed reservation request and its answer.
#[derive(Debug, Clone)]
pub struct Reservation {
    pub order: PreserveOrder,
    pub response: RawResponse,
    pub outcome: ReservationOutcome,
}

/// Read a reservation response.
pub fn reservation_outcome(response: &RawResponse) -> ReservationOutcome {
    if !response.is_ok() {
        return ReservationOutcome::Rejected {
            message: format!("status {}", response.status),
        };
    }

    match response.json() {
        Some(body @ Value::Object(_)) => {
            if envelope_status(&body) == Some(STATUS_SUCCESS) {
                ReservationOutcome::Reserved {
                    order_id: order_id(&body),
                }
            } else {
                ReservationOutcome::Rejected {
                    message: envelope_message(&body)
                        .unwrap_or("unknown error")
                        .to_string(),
                }
            }
        }
        _ => ReservationOutcome::Unreadable,
    }
}

/// Id of the first contact of an account, if the service lists one.
pub async fn first_contact_id(
    client: &TicketClient,
    token: &str,
    account_id: &str,
) -> Result<Option<String>, TsError> {
    let response = client.contacts(token, account_id).await?;

    let successful = response
        .json()
        .is_some_and(|body| envelope_status(&body) == Some(STATUS_SUCCESS));
    if !successful {
        return Ok(None);
    }

    Ok(contacts_list(&response).into_iter().next().and_then(|c| c.id))
}

/// Log in, resolve account and contact, and place a reservation.
///
/// High-speed trains are reserved through the preserve service, normal
/// trains through the preserve-other service.
pub async fn reserve(
    client: &TicketClient,
    credentials: &Credentials,
    class: ServiceClass,
    details: OrderDetails,
    fallbacks: ReservationFallbacks,
) -> Result<Reservation, TsError> {
    let session = client.authenticate(credentials).await?;
    info!(username = %credentials.username, "logged in");

    let account_id = match session.user_id {
        Some(id) => id,
        None => {
            warn!("login response has no account id, using fallback");
            fallbacks
                .account_id
                .ok_or(TsError::Unresolved("account id"))?
        }
    };

    let contacts_id = match first_contact_id(client, &session.token, &account_id).await? {
        Some(id) => id,
        None => {
            warn!(%account_id, "first contact of the account has no id, using fallback");
            fallbacks
                .contacts_id
                .ok_or(TsError::Unresolved("contacts id"))?
        }
    };
    info!(%account_id, %contacts_id, "resolved reservation ids");

    let order = details.into_order(account_id, contacts_id);
    let response = client.preserve(&session.token, class, &order).await?;
    let outcome = reservation_outcome(&response);

    Ok(Reservation {
        order,
        response,
        outcome,
    })
}
