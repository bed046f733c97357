use thiserror::Error;

use super::executor::ExecutorError;
use crate::executor::types::DriverError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Source(#[from] SourceError),
    #[error("executor error: {0}")]
    Executor(#[from] ExecutorError),
    #[error("report error: {0}")]
    Report(#[from] ReportError),
    #[error("logging setup failed: {0}")]
    Logging(String),
    #[error("anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

impl CliError {
    /// Process exit code for a fatal error.
    ///
    /// 0 is reserved for completed runs, including runs where some
    /// statements failed.
    pub fn exit_code(&self) -> i32 {
        // 11: config error
        // 12: sql directory missing / unreadable
        // 20: report / IO error
        // 21: driver not found
        // 22: database connection failure at startup
        // 50: internal/uncategorized
        match self {
            CliError::Config(_) | CliError::Logging(_) => 11,
            CliError::Source(_) => 12,
            CliError::Executor(e) => match e {
                ExecutorError::InvalidWorkerCount(_) => 11,
                ExecutorError::Driver(DriverError::NotFound { .. }) => 21,
                ExecutorError::Driver(_) => 22,
                _ => 50,
            },
            CliError::Report(_) => 20,
            CliError::Anyhow(_) => 50,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read configuration file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("missing required configuration key '{0}'")]
    MissingKey(String),
    #[error("invalid value for '{key}': expected {expected}, got '{value}'")]
    InvalidValue {
        key: String,
        expected: &'static str,
        value: String,
    },
}

#[derive(Error, Debug)]
pub enum SourceError {
    #[error(
        "DIRECTORY NOT FOUND: the directory \"{path}\" was not found. Edit sql_file_directory in the configuration file to correct."
    )]
    DirectoryNotFound { path: String },
    #[error("cannot list SQL directory \"{path}\": {source}")]
    DirectoryUnreadable {
        path: String,
        source: std::io::Error,
    },
    #[error("cannot read SQL file \"{path}\": {source}")]
    FileUnreadable {
        path: String,
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("cannot create report directory {path}: {source}")]
    CreateDir {
        path: String,
        source: std::io::Error,
    },
    #[error("cannot write report {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}
