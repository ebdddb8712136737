//! The full route verification run.

use chrono::NaiveDate;
use tracing::info;

use crate::domain::{ServiceClass, pairs_from_routes};
use crate::ts::TicketClient;

use super::aggregate::{ProbeStats, RouteTables, Surveyor};
use super::config::SurveyConfig;
use super::error::SurveyError;
use super::report::{render_config, write_config};

/// Outcome of a verification run.
#[derive(Debug, Clone)]
pub struct VerifyReport {
    /// Number of route documents fetched.
    pub routes: usize,
    /// Date the trips were queried for.
    pub date: NaiveDate,
    pub tables: RouteTables,
    pub stats: ProbeStats,
    /// The rendered configuration, as written to disk.
    pub config_text: String,
}

impl VerifyReport {
    /// Served pairs recorded for one class.
    pub fn count(&self, class: ServiceClass) -> usize {
        self.tables.count(class)
    }
}

/// Fetch routes, probe every candidate pair and write the route tables.
///
/// The output file is written once, after all probing has finished.
pub async fn verify_routes(
    client: &TicketClient,
    config: &SurveyConfig,
    today: NaiveDate,
) -> Result<VerifyReport, SurveyError> {
    info!(base_url = client.base_url(), "fetching routes");
    let routes = client.fetch_routes().await?;
    if routes.is_empty() {
        return Err(SurveyError::NoRoutes);
    }
    info!(routes = routes.len(), "fetched routes");

    let pairs = pairs_from_routes(&routes);
    info!(pairs = pairs.len(), "extracted candidate station pairs");

    let date = config.survey_date(today);
    info!(%date, "probing trips; this may take a while");

    let result = Surveyor::new(client).survey(&pairs, date).await;

    let config_text = render_config(&result.tables);
    write_config(&config.output_path, &config_text)?;
    info!(path = %config.output_path.display(), "configuration written");

    Ok(VerifyReport {
        routes: routes.len(),
        date,
        tables: result.tables,
        stats: result.stats,
        config_text,
    })
}
