//! Survey error types.

use std::path::PathBuf;

use crate::ts::TsError;

/// Errors that stop a survey run.
///
/// Individual probe failures are not errors; see `ProbeOutcome`.
#[derive(Debug, thiserror::Error)]
pub enum SurveyError {
    /// Route list could not be fetched
    #[error("failed to fetch routes: {0}")]
    RouteFetch(#[from] TsError),

    /// Route service returned an empty list
    #[error("route service returned no routes")]
    NoRoutes,

    /// Output file could not be written
    #[error("failed to write {}: {message}", path.display())]
    Write { path: PathBuf, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            SurveyError::NoRoutes.to_string(),
            "route service returned no routes"
        );

        let err = SurveyError::Write {
            path: PathBuf::from("out/routes.py"),
            message: "permission denied".into(),
        };
        assert_eq!(
            err.to_string(),
            "failed to write out/routes.py: permission denied"
        );

        let err = SurveyError::from(TsError::UnexpectedShape("route payload is not a list".into()));
        assert_eq!(
            err.to_string(),
            "failed to fetch routes: unexpected response shape: route payload is not a list"
        );
    }
}
