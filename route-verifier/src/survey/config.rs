//! Survey configuration.

use std::path::PathBuf;

use chrono::{Duration, NaiveDate};

/// Default file the generated route tables are written to.
pub const DEFAULT_OUTPUT_PATH: &str = "routes_config_output.py";

/// Configuration parameters for a route survey.
#[derive(Debug, Clone)]
pub struct SurveyConfig {
    /// How many days after the run date to query trips for.
    pub days_ahead: i64,

    /// Explicit survey date; overrides `days_ahead` when set.
    pub date: Option<NaiveDate>,

    /// Where the generated configuration is written.
    pub output_path: PathBuf,
}

impl SurveyConfig {
    /// Set the day offset from the run date.
    pub fn with_days_ahead(mut self, days: i64) -> Self {
        self.days_ahead = days;
        self
    }

    /// Survey a fixed date instead of an offset from the run date.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Set the output file.
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// The date trips are queried for, given the run date.
    ///
    /// A single date can miss routes that only run on some days of the week.
    /// An offset outside the calendar range falls back to the run date.
    pub fn survey_date(&self, today: NaiveDate) -> NaiveDate {
        self.date.unwrap_or_else(|| {
            Duration::try_days(self.days_ahead)
                .and_then(|offset| today.checked_add_signed(offset))
                .unwrap_or(today)
        })
    }
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            days_ahead: 7,
            date: None,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}
