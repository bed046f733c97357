use std::sync::Arc;

use crate::config::RunConfiguration;

use super::traits::DatabaseDriver;
use super::types::{format_elapsed, ExecutionResult, SqlTask, Stopwatch, TaskOutcome, Timing};

/// Runs one task at a time against a fresh database connection.
///
/// `execute` is blocking and never fails: connection errors and statement
/// errors both come back as an `Error` outcome. The scheduler calls it from
/// blocking worker threads.
pub struct ExecutionEngine {
    driver: Arc<dyn DatabaseDriver>,
    config: Arc<RunConfiguration>,
}

impl ExecutionEngine {
    pub fn new(driver: Arc<dyn DatabaseDriver>, config: Arc<RunConfiguration>) -> Self {
        Self { driver, config }
    }

    pub fn config(&self) -> &Arc<RunConfiguration> {
        &self.config
    }

    /// Open a connection, run the task's statement, close the connection.
    ///
    /// Start/end times bracket the statement call only. When the connection
    /// cannot be opened they bracket the connect attempt instead.
    pub fn execute(&self, task: &SqlTask) -> ExecutionResult {
        let db = &self.config.database;

        let connect_watch = Stopwatch::start();
        let mut connection = match self.driver.connect(db) {
            Ok(connection) => connection,
            Err(e) => {
                let timing = connect_watch.stop();
                tracing::error!(
                    task = %task.identifier(),
                    seq = task.sequence_number(),
                    url = %db.connection_url(self.driver.name()),
                    error = %e,
                    "cannot open connection"
                );
                return self.result(task, TaskOutcome::error(e.to_string()), timing);
            }
        };

        tracing::debug!(task = %task.identifier(), seq = task.sequence_number(), "executing statement");
        let watch = Stopwatch::start();
        let executed = connection.execute(task.sql_text());
        let timing = watch.stop();

        // The statement outcome stands even if close fails.
        if let Err(e) = connection.close() {
            tracing::warn!(task = %task.identifier(), error = %e, "closing connection failed");
        }

        let outcome = match executed {
            Ok(()) => {
                tracing::info!(
                    task = %task.identifier(),
                    seq = task.sequence_number(),
                    elapsed = %format_elapsed(timing.elapsed),
                    "statement completed"
                );
                TaskOutcome::Success
            }
            Err(e) => {
                tracing::warn!(
                    task = %task.identifier(),
                    seq = task.sequence_number(),
                    error = %e,
                    "statement failed"
                );
                tracing::debug!(task = %task.identifier(), sql = %task.sql_text(), "query executed");
                TaskOutcome::error(e.to_string())
            }
        };

        self.result(task, outcome, timing)
    }

    /// Error result for a task whose worker died before producing one.
    pub fn aborted(&self, task: &SqlTask, detail: impl Into<String>) -> ExecutionResult {
        let timing = Stopwatch::start().stop();
        self.result(task, TaskOutcome::error(detail), timing)
    }

    fn result(&self, task: &SqlTask, outcome: TaskOutcome, timing: Timing) -> ExecutionResult {
        ExecutionResult::new(task, self.config.database.username.as_str(), outcome, timing)
    }
}
