use thiserror::Error;

/// Errors raised by database drivers and connections.
///
/// Inside a task these are folded into the task's outcome; only preflight
/// lets them escape as fatal errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DriverError {
    #[error("driver not found: '{driver}' (registered: {})", .available.join(", "))]
    NotFound {
        driver: String,
        available: Vec<String>,
    },

    #[error("connection to {url} failed: {reason}")]
    Connect { url: String, reason: String },

    #[error("{0}")]
    Statement(String),

    #[error("closing connection failed: {0}")]
    Close(String),
}
