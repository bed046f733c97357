use std::path::PathBuf;

use crate::error::ReportError;
use crate::executor::types::RunReport;

use super::{render_csv, report_file_name};

/// Writes finished runs as CSV files into one directory.
pub struct ReportWriter {
    directory: PathBuf,
}

impl ReportWriter {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Write `report` and return the path of the new file. The directory
    /// is created when missing.
    #[tracing::instrument(name = "report.write", skip_all, fields(results = report.total()))]
    pub async fn write(&self, report: &RunReport) -> Result<PathBuf, ReportError> {
        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(|source| ReportError::CreateDir {
                path: self.directory.display().to_string(),
                source,
            })?;

        let name = report_file_name(report.mode, report.max_workers, report.finished_at);
        let path = self.directory.join(name);
        tokio::fs::write(&path, render_csv(report))
            .await
            .map_err(|source| ReportError::Write {
                path: path.display().to_string(),
                source,
            })?;

        tracing::info!(path = %path.display(), "report written");
        Ok(path)
    }
}
