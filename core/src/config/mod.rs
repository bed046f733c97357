mod load;
mod properties;
mod types;

pub use load::{
    from_properties, load_from_path, load_from_path_with_env, DEFAULT_CONFIG_FILE, ENV_DATABASE_PASSWORD,
    ENV_MAX_CONNECTIONS, ENV_SQL_DIRECTORY,
};
pub use properties::Properties;
pub use types::{ConcurrencyMode, DatabaseConfig, LoggingConfig, RunConfiguration};
