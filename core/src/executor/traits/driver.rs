use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::DatabaseConfig;
use crate::executor::types::DriverError;

/// A database driver that can open connections.
///
/// Drivers are shared across all workers, so connecting must be safe from
/// many threads at once.
pub trait DatabaseDriver: Send + Sync {
    /// Primary identifier, also used as the URL scheme in logs.
    fn name(&self) -> &str;

    /// Other identifiers the driver answers to in the `jdbc_driver` key.
    fn aliases(&self) -> &[&'static str] {
        &[]
    }

    /// Open a fresh connection. Connections are never reused across tasks.
    fn connect(&self, db: &DatabaseConfig) -> Result<Box<dyn DatabaseConnection>, DriverError>;
}

/// One open connection, owned by exactly one worker for one task.
///
/// Dropping a connection without calling [`close`](Self::close) must still
/// release it.
pub trait DatabaseConnection: Send {
    /// Run one statement to completion, draining and discarding any rows.
    fn execute(&mut self, sql: &str) -> Result<(), DriverError>;

    fn close(self: Box<Self>) -> Result<(), DriverError>;
}

/// Drivers by identifier. Lookup is case-insensitive.
#[derive(Default, Clone)]
pub struct DriverRegistry {
    drivers: BTreeMap<String, Arc<dyn DatabaseDriver>>,
}

impl DriverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, driver: Arc<dyn DatabaseDriver>) {
        let mut keys = vec![driver.name().to_ascii_lowercase()];
        keys.extend(driver.aliases().iter().map(|a| a.to_ascii_lowercase()));
        for key in keys {
            if self.drivers.insert(key.clone(), driver.clone()).is_some() {
                tracing::warn!(driver = %key, "driver identifier registered twice; last one wins");
            }
        }
    }

    pub fn resolve(&self, identifier: &str) -> Result<Arc<dyn DatabaseDriver>, DriverError> {
        self.drivers
            .get(&identifier.trim().to_ascii_lowercase())
            .cloned()
            .ok_or_else(|| DriverError::NotFound {
                driver: identifier.to_string(),
                available: self.identifiers(),
            })
    }

    /// All registered identifiers, aliases included, sorted.
    pub fn identifiers(&self) -> Vec<String> {
        self.drivers.keys().cloned().collect()
    }
}
