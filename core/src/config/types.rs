use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Complete configuration of one load run.
///
/// Built once at startup and shared read-only (behind an `Arc`) by every
/// worker for the rest of the run.
#[derive(Debug, Clone)]
pub struct RunConfiguration {
    pub mode: ConcurrencyMode,

    /// Worker pool bound. Only used in parallel mode, but always validated.
    pub max_workers: usize,

    pub database: DatabaseConfig,

    /// Directory holding one SQL statement per file.
    pub sql_directory: PathBuf,

    /// Where the CSV report is written.
    pub report_directory: PathBuf,

    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConcurrencyMode {
    /// One statement at a time, in sequence order.
    Serial,
    /// Up to `max_workers` statements at a time.
    Parallel,
}

impl ConcurrencyMode {
    pub fn from_parallel_flag(parallel: bool) -> Self {
        if parallel {
            Self::Parallel
        } else {
            Self::Serial
        }
    }

    pub fn is_parallel(self) -> bool {
        matches!(self, Self::Parallel)
    }

    /// Mode segment of the report file name: `Serial` or
    /// `Parallel_Threads-<max_workers>`.
    pub fn report_label(self, max_workers: usize) -> String {
        match self {
            Self::Serial => "Serial".to_string(),
            Self::Parallel => format!("Parallel_Threads-{}", max_workers),
        }
    }
}

impl fmt::Display for ConcurrencyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Serial => f.write_str("serial"),
            Self::Parallel => f.write_str("parallel"),
        }
    }
}

/// Database connection parameters.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Identifier of the registered driver (the `jdbc_driver` key).
    pub driver: String,
    pub host: String,
    pub port: u16,
    pub database_name: String,
    pub username: String,
    pub password: String,
    pub use_tls: bool,
}

impl DatabaseConfig {
    /// Connection URL for logs and error messages. Never contains the password.
    pub fn connection_url(&self, scheme: &str) -> String {
        let mut url = format!(
            "{}://{}:{}/{}",
            scheme, self.host, self.port, self.database_name
        );
        if self.use_tls {
            url.push_str(":sslConnection=true;");
        }
        url
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("driver", &self.driver)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database_name", &self.database_name)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("use_tls", &self.use_tls)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub enabled: bool,

    /// If true, log to stderr.
    pub console: bool,

    /// If true, log to a file under `directory` (or OS temp dir if unset).
    pub file: bool,

    /// EnvFilter string, e.g. "info" or "sqlload_core=debug".
    pub level: String,

    /// Optional directory for log files. If empty or unset, uses OS temp dir.
    pub directory: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            console: true,
            file: false,
            level: "info".to_string(),
            directory: None,
        }
    }
}
