#[allow(clippy::module_inception)]
pub mod error;
pub mod executor;

pub use error::{CliError, ConfigError, ReportError, SourceError};
pub use executor::ExecutorError;
