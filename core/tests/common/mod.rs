#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use sqlload_core::config::{ConcurrencyMode, DatabaseConfig, LoggingConfig, RunConfiguration};
use sqlload_core::executor::types::{DriverError, SqlTask};
use sqlload_core::executor::{DatabaseConnection, DatabaseDriver, OutputRendererPlugin, RenderEvent};

/// Route `tracing` output through the test harness; safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

pub fn config(mode: ConcurrencyMode, max_workers: usize) -> Arc<RunConfiguration> {
    Arc::new(RunConfiguration {
        mode,
        max_workers,
        database: DatabaseConfig {
            driver: "fake".into(),
            host: "localhost".into(),
            port: 50000,
            database_name: "LOADDB".into(),
            username: "loader".into(),
            password: "secret".into(),
            use_tls: false,
        },
        sql_directory: PathBuf::from("sql"),
        report_directory: PathBuf::from("."),
        logging: LoggingConfig::default(),
    })
}

/// `count` tasks named `001.sql`.. with sequence numbers 1..=count.
pub fn tasks(count: usize) -> Vec<SqlTask> {
    (1..=count)
        .map(|seq| SqlTask::new(format!("{seq:03}.sql"), seq, format!("SELECT {seq}")))
        .collect()
}

/// Driver that sleeps inside `execute` and records how many statements
/// were running at once. Statements mentioning `not_a_table` fail;
/// statements mentioning `panic_now` panic the worker.
#[derive(Clone)]
pub struct CountingDriver {
    delay: Duration,
    active: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
    executed: Arc<Mutex<Vec<String>>>,
}

impl CountingDriver {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            active: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
            executed: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// Statement texts in the order they started executing.
    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }
}

impl DatabaseDriver for CountingDriver {
    fn name(&self) -> &str {
        "fake"
    }

    fn connect(&self, _db: &DatabaseConfig) -> Result<Box<dyn DatabaseConnection>, DriverError> {
        Ok(Box::new(CountingConnection {
            driver: self.clone(),
        }))
    }
}

struct CountingConnection {
    driver: CountingDriver,
}

struct ActiveGuard(Arc<AtomicUsize>);

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl DatabaseConnection for CountingConnection {
    fn execute(&mut self, sql: &str) -> Result<(), DriverError> {
        let now = self.driver.active.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = ActiveGuard(self.driver.active.clone());
        self.driver.peak.fetch_max(now, Ordering::SeqCst);
        self.driver.executed.lock().unwrap().push(sql.to_string());

        std::thread::sleep(self.driver.delay);

        if sql.contains("panic_now") {
            panic!("driver crashed on {sql}");
        }
        if sql.contains("not_a_table") {
            return Err(DriverError::Statement(format!(
                "no such table: not_a_table ({sql})"
            )));
        }
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<(), DriverError> {
        Ok(())
    }
}

/// Driver that can never connect.
pub struct UnreachableDriver;

impl DatabaseDriver for UnreachableDriver {
    fn name(&self) -> &str {
        "unreachable"
    }

    fn connect(&self, db: &DatabaseConfig) -> Result<Box<dyn DatabaseConnection>, DriverError> {
        Err(DriverError::Connect {
            url: db.connection_url(self.name()),
            reason: "connection refused".into(),
        })
    }
}

/// Renderer that keeps every event it sees.
#[derive(Default)]
pub struct RecordingRenderer {
    events: Mutex<Vec<RenderEvent>>,
}

impl RecordingRenderer {
    pub fn events(&self) -> Vec<RenderEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl OutputRendererPlugin for RecordingRenderer {
    fn name(&self) -> &str {
        "recording"
    }

    fn format(&self) -> &str {
        "memory"
    }

    fn render(&self, event: &RenderEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
