use std::sync::Arc;

use crate::config::RunConfiguration;
use crate::error::ExecutorError;

use super::traits::{DatabaseDriver, DriverRegistry};

/// Resolve the configured driver and prove the database is reachable by
/// opening and closing one connection.
///
/// Failure here is fatal for the run: nothing has been executed yet, and
/// every task would fail the same way.
#[tracing::instrument(name = "preflight", skip_all, fields(driver = %config.database.driver))]
pub async fn preflight(
    registry: &DriverRegistry,
    config: Arc<RunConfiguration>,
) -> Result<Arc<dyn DatabaseDriver>, ExecutorError> {
    let driver = registry.resolve(&config.database.driver)?;
    let url = config.database.connection_url(driver.name());
    tracing::info!(%url, user = %config.database.username, "checking database connectivity");

    let probe_driver = driver.clone();
    tokio::task::spawn_blocking(move || {
        let connection = probe_driver.connect(&config.database)?;
        connection.close()
    })
    .await
    .map_err(|e| ExecutorError::Runner(format!("preflight worker failed: {e}")))??;

    tracing::info!(%url, "database reachable");
    Ok(driver)
}
