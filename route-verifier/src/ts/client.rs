//! Ticketing system HTTP client.
//!
//! Provides async methods for the gateway endpoints the survey and the
//! exploration commands use. Only trip queries carry a timeout; the other
//! calls wait for the gateway as long as it takes.

use std::time::Duration;

use reqwest::RequestBuilder;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::domain::ServiceClass;

use super::error::TsError;
use super::types::{
    Credentials, PreserveOrder, RawResponse, STATUS_SUCCESS, TripQuery, envelope_status,
    first_str, list_payload,
};

/// Default gateway address of the ticketing deployment.
const DEFAULT_BASE_URL: &str = "http://10.10.1.98:32677";

/// Default timeout for a single trip query.
const DEFAULT_TRIP_TIMEOUT_SECS: u64 = 5;

const ROUTES_PATH: &str = "/api/v1/routeservice/routes";
const USERS_PATH: &str = "/api/v1/users";
const LOGIN_PATH: &str = "/api/v1/users/login";
const ASSURANCES_PATH: &str = "/api/v1/assuranceservice/assurances/assurance";
const ASSURANCE_TYPES_PATH: &str = "/api/v1/assuranceservice/assurances/types";

/// Configuration for the ticketing client.
#[derive(Debug, Clone)]
pub struct TicketClientConfig {
    /// Gateway base URL, without a trailing slash
    pub base_url: String,
    /// Timeout for trip queries in seconds
    pub trip_timeout_secs: u64,
}

impl TicketClientConfig {
    /// Create a config pointing at the given gateway.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::default().with_base_url(base_url)
    }

    /// Set the gateway base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the trip query timeout.
    pub fn with_trip_timeout(mut self, secs: u64) -> Self {
        self.trip_timeout_secs = secs;
        self
    }
}

impl Default for TicketClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            trip_timeout_secs: DEFAULT_TRIP_TIMEOUT_SECS,
        }
    }
}

/// An authenticated session obtained from the user service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginSession {
    /// Bearer token for authenticated calls.
    pub token: String,
    /// Account id of the logged-in user, when the service reports it.
    pub user_id: Option<String>,
}

impl LoginSession {
    /// Extract a session from a login response.
    pub fn from_response(response: &RawResponse) -> Result<Self, TsError> {
        if !response.is_ok() {
            return Err(TsError::LoginFailed(format!("status {}", response.status)));
        }

        let body = response
            .json()
            .ok_or_else(|| TsError::LoginFailed("response is not JSON".to_string()))?;
        let data = body.get("data").unwrap_or(&Value::Null);

        let token = first_str(data, &["token"])
            .ok_or_else(|| TsError::LoginFailed("no token in response".to_string()))?;

        // userId is only trusted from a successful envelope
        let user_id = if envelope_status(&body) == Some(STATUS_SUCCESS) {
            first_str(data, &["userId"]).map(str::to_string)
        } else {
            None
        };

        Ok(Self {
            token: token.to_string(),
            user_id,
        })
    }
}

/// Ticketing gateway client.
#[derive(Debug, Clone)]
pub struct TicketClient {
    http: reqwest::Client,
    base_url: String,
    trip_timeout: Duration,
}

impl TicketClient {
    /// Create a new client with the given configuration.
    pub fn new(config: TicketClientConfig) -> Result<Self, TsError> {
        let http = reqwest::Client::builder().build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            trip_timeout: Duration::from_secs(config.trip_timeout_secs),
        })
    }

    /// Gateway base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch every route document.
    ///
    /// The route service answers with either a bare list or an envelope
    /// whose `data` is a list.
    pub async fn fetch_routes(&self) -> Result<Vec<Value>, TsError> {
        let response = self.send(self.http.get(self.url(ROUTES_PATH))).await?;

        if !response.is_ok() {
            return Err(TsError::Api {
                status: response.status,
                message: response.body,
            });
        }

        let body: Value = serde_json::from_str(&response.body).map_err(|e| TsError::Json {
            message: e.to_string(),
            body: Some(response.body.chars().take(500).collect()),
        })?;

        list_payload(&body)
            .map(<[Value]>::to_vec)
            .ok_or_else(|| TsError::UnexpectedShape("route payload is not a list".to_string()))
    }

    /// Query remaining trips between two stations for one service class.
    ///
    /// Bounded by the configured trip timeout.
    pub async fn trips_left(
        &self,
        class: ServiceClass,
        query: &TripQuery,
    ) -> Result<RawResponse, TsError> {
        let path = format!("/api/v1/{}/trips/left", class.travel_service());
        let request = self
            .http
            .post(self.url(&path))
            .timeout(self.trip_timeout)
            .json(query);

        self.send(request).await
    }

    /// Log in and return the raw response.
    pub async fn login(&self, credentials: &Credentials) -> Result<RawResponse, TsError> {
        self.send(self.http.post(self.url(LOGIN_PATH)).json(credentials))
            .await
    }

    /// Log in and extract the session.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<LoginSession, TsError> {
        let response = self.login(credentials).await?;
        LoginSession::from_response(&response)
    }

    /// List all users. The endpoint takes no token.
    pub async fn users(&self) -> Result<RawResponse, TsError> {
        self.send(self.http.get(self.url(USERS_PATH))).await
    }

    /// Delete a user through the admin user service.
    pub async fn delete_user(&self, token: &str, user_id: &str) -> Result<RawResponse, TsError> {
        let path = format!("/api/v1/adminuserservice/users/{user_id}");
        self.send(self.http.delete(self.url(&path)).bearer_auth(token))
            .await
    }

    /// List all assurances.
    pub async fn assurances(&self, token: &str) -> Result<RawResponse, TsError> {
        self.get_authed(ASSURANCES_PATH, token).await
    }

    /// List assurance types.
    pub async fn assurance_types(&self, token: &str) -> Result<RawResponse, TsError> {
        self.get_authed(ASSURANCE_TYPES_PATH, token).await
    }

    /// List food offered on a trip between two stations.
    pub async fn foods(
        &self,
        date: &str,
        start: &str,
        end: &str,
        trip_id: &str,
    ) -> Result<RawResponse, TsError> {
        let path = format!("/api/v1/foodservice/foods/{date}/{start}/{end}/{trip_id}");
        self.send(self.http.get(self.url(&path))).await
    }

    /// List the contacts of an account.
    pub async fn contacts(&self, token: &str, account_id: &str) -> Result<RawResponse, TsError> {
        let path = format!("/api/v1/contactservice/contacts/account/{account_id}");
        self.get_authed(&path, token).await
    }

    /// Reserve a ticket.
    ///
    /// High-speed trains go through `preserveservice`, normal trains
    /// through `preserveotherservice`.
    pub async fn preserve(
        &self,
        token: &str,
        class: ServiceClass,
        order: &PreserveOrder,
    ) -> Result<RawResponse, TsError> {
        self.post_authed(preserve_path(class), token, order).await
    }

    async fn get_authed(&self, path: &str, token: &str) -> Result<RawResponse, TsError> {
        self.send(self.http.get(self.url(path)).bearer_auth(token))
            .await
    }

    async fn post_authed<B: Serialize + ?Sized>(
        &self,
        path: &str,
        token: &str,
        body: &B,
    ) -> Result<RawResponse, TsError> {
        self.send(self.http.post(self.url(path)).bearer_auth(token).json(body))
            .await
    }

    /// Send a request and buffer the whole response.
    async fn send(&self, request: RequestBuilder) -> Result<RawResponse, TsError> {
        let response = request.send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;

        debug!(status, bytes = body.len(), "response received");

        Ok(RawResponse {
            status,
            content_type,
            body,
        })
    }
}

fn preserve_path(class: ServiceClass) -> &'static str {
    match class {
        ServiceClass::HighSpeed => "/api/v1/preserveservice/preserve",
        ServiceClass::Normal => "/api/v1/preserveotherservice/preserveOther",
    }
}
