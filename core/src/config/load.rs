use std::path::{Path, PathBuf};

use crate::error::ConfigError;

use super::properties::Properties;
use super::types::{ConcurrencyMode, DatabaseConfig, LoggingConfig, RunConfiguration};

/// Configuration file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.props";

pub const ENV_SQL_DIRECTORY: &str = "SQLLOAD_SQL_DIRECTORY";
pub const ENV_DATABASE_PASSWORD: &str = "SQLLOAD_DATABASE_PASSWORD";
pub const ENV_MAX_CONNECTIONS: &str = "SQLLOAD_MAX_CONNECTIONS";

const KEY_DRIVER: &str = "jdbc_driver";
const KEY_HOST: &str = "database_host_name";
const KEY_PORT: &str = "database_port";
const KEY_USE_SSL: &str = "use_ssl_connection";
const KEY_DATABASE: &str = "database_name";
const KEY_USERNAME: &str = "database_username";
const KEY_PASSWORD: &str = "database_password";
const KEY_PARALLEL: &str = "parallel_execution";
const KEY_MAX_CONNECTIONS: &str = "parallel_execution_max_connections";
const KEY_SQL_DIRECTORY: &str = "sql_file_directory";

const KEY_REPORT_DIRECTORY: &str = "report_directory";
const KEY_LOG_ENABLED: &str = "log_enabled";
const KEY_LOG_CONSOLE: &str = "log_console";
const KEY_LOG_FILE: &str = "log_file";
const KEY_LOG_LEVEL: &str = "log_level";
const KEY_LOG_DIRECTORY: &str = "log_directory";

/// Environment variable → property key. Environment wins over the file.
const ENV_OVERRIDES: [(&str, &str); 3] = [
    (ENV_SQL_DIRECTORY, KEY_SQL_DIRECTORY),
    (ENV_DATABASE_PASSWORD, KEY_PASSWORD),
    (ENV_MAX_CONNECTIONS, KEY_MAX_CONNECTIONS),
];

/// Load a run configuration from a properties file, applying environment
/// overrides from the process environment.
pub fn load_from_path(path: &Path) -> Result<RunConfiguration, ConfigError> {
    load_from_path_with_env(path, |name| std::env::var(name).ok())
}

/// Same as [`load_from_path`], with an injectable environment lookup.
pub fn load_from_path_with_env<F>(path: &Path, env: F) -> Result<RunConfiguration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;

    let mut props = Properties::parse(&text);
    for (var, key) in ENV_OVERRIDES {
        if let Some(v) = env(var) {
            if !v.trim().is_empty() {
                tracing::debug!(key, "configuration value overridden from {}", var);
                props.set(key, v);
            }
        }
    }

    from_properties(&props)
}

/// Build and validate a run configuration from parsed properties.
///
/// `parallel_execution_max_connections` must be present and at least 1
/// even when parallel execution is disabled.
pub fn from_properties(props: &Properties) -> Result<RunConfiguration, ConfigError> {
    let parallel = required_bool(props, KEY_PARALLEL)?;
    let max_workers = required_usize(props, KEY_MAX_CONNECTIONS)?;
    if max_workers < 1 {
        return Err(ConfigError::InvalidValue {
            key: KEY_MAX_CONNECTIONS.to_string(),
            expected: "a positive integer",
            value: max_workers.to_string(),
        });
    }

    let port_raw = required(props, KEY_PORT)?;
    let port = port_raw
        .trim()
        .parse::<u16>()
        .map_err(|_| ConfigError::InvalidValue {
            key: KEY_PORT.to_string(),
            expected: "a port number",
            value: port_raw.to_string(),
        })?;

    let database = DatabaseConfig {
        driver: required(props, KEY_DRIVER)?.trim().to_string(),
        host: required(props, KEY_HOST)?.trim().to_string(),
        port,
        database_name: required(props, KEY_DATABASE)?.trim().to_string(),
        username: required(props, KEY_USERNAME)?.trim().to_string(),
        password: required(props, KEY_PASSWORD)?.to_string(),
        use_tls: required_bool(props, KEY_USE_SSL)?,
    };

    let sql_directory = PathBuf::from(required(props, KEY_SQL_DIRECTORY)?.trim());
    let report_directory = optional(props, KEY_REPORT_DIRECTORY)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    Ok(RunConfiguration {
        mode: ConcurrencyMode::from_parallel_flag(parallel),
        max_workers,
        database,
        sql_directory,
        report_directory,
        logging: logging_from_properties(props)?,
    })
}

fn logging_from_properties(props: &Properties) -> Result<LoggingConfig, ConfigError> {
    let defaults = LoggingConfig::default();
    Ok(LoggingConfig {
        enabled: optional_bool(props, KEY_LOG_ENABLED)?.unwrap_or(defaults.enabled),
        console: optional_bool(props, KEY_LOG_CONSOLE)?.unwrap_or(defaults.console),
        file: optional_bool(props, KEY_LOG_FILE)?.unwrap_or(defaults.file),
        level: optional(props, KEY_LOG_LEVEL)
            .map(str::to_string)
            .unwrap_or(defaults.level),
        directory: optional(props, KEY_LOG_DIRECTORY).map(str::to_string),
    })
}

fn required<'a>(props: &'a Properties, key: &str) -> Result<&'a str, ConfigError> {
    props
        .get(key)
        .ok_or_else(|| ConfigError::MissingKey(key.to_string()))
}

fn optional<'a>(props: &'a Properties, key: &str) -> Option<&'a str> {
    props.get(key).map(str::trim).filter(|v| !v.is_empty())
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            expected: "true or false",
            value: raw.to_string(),
        }),
    }
}

fn required_bool(props: &Properties, key: &str) -> Result<bool, ConfigError> {
    parse_bool(key, required(props, key)?)
}

fn optional_bool(props: &Properties, key: &str) -> Result<Option<bool>, ConfigError> {
    optional(props, key).map(|v| parse_bool(key, v)).transpose()
}

fn required_usize(props: &Properties, key: &str) -> Result<usize, ConfigError> {
    let raw = required(props, key)?;
    raw.trim()
        .parse::<usize>()
        .map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            expected: "a positive integer",
            value: raw.to_string(),
        })
}
