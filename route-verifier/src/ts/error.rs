//! Ticketing API error types.

/// Errors from the ticketing HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum TsError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// JSON deserialization failed
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Response was JSON but not the expected shape
    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),

    /// Login did not yield a token
    #[error("login failed: {0}")]
    LoginFailed(String),

    /// A value needed for the next request could not be resolved
    #[error("could not resolve {0}")]
    Unresolved(&'static str),
}

impl TsError {
    /// Whether this is a request that ran out of time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, TsError::Http(e) if e.is_timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = TsError::Api {
            status: 500,
            message: "Internal Server Error".into(),
        };
        assert_eq!(err.to_string(), "API error 500: Internal Server Error");

        let err = TsError::Json {
            message: "expected value".into(),
            body: Some("<html>".into()),
        };
        assert!(err.to_string().contains("JSON parse error"));
        assert!(err.to_string().contains("expected value"));

        let err = TsError::LoginFailed("no token in response".into());
        assert_eq!(err.to_string(), "login failed: no token in response");

        let err = TsError::Unresolved("contacts id");
        assert_eq!(err.to_string(), "could not resolve contacts id");
    }

    #[test]
    fn non_http_errors_are_not_timeouts() {
        assert!(!TsError::UnexpectedShape("string".into()).is_timeout());
    }
}
