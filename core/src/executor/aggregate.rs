use std::time::Instant;

use chrono::{DateTime, Local};

use crate::config::ConcurrencyMode;

use super::types::{ExecutionResult, RunReport};

/// Accumulates results as they arrive and keeps the success/error totals.
///
/// `success_count + error_count` always equals the number of recorded
/// results; recording order does not affect the totals.
pub struct ResultAggregator {
    run_id: String,
    mode: ConcurrencyMode,
    max_workers: usize,
    started_at: DateTime<Local>,
    clock: Instant,
    results: Vec<ExecutionResult>,
    success_count: usize,
    error_count: usize,
}

impl ResultAggregator {
    pub fn new(run_id: impl Into<String>, mode: ConcurrencyMode, max_workers: usize) -> Self {
        Self::with_capacity(run_id, mode, max_workers, 0)
    }

    pub fn with_capacity(
        run_id: impl Into<String>,
        mode: ConcurrencyMode,
        max_workers: usize,
        capacity: usize,
    ) -> Self {
        Self {
            run_id: run_id.into(),
            mode,
            max_workers,
            started_at: Local::now(),
            clock: Instant::now(),
            results: Vec::with_capacity(capacity),
            success_count: 0,
            error_count: 0,
        }
    }

    pub fn record(&mut self, result: ExecutionResult) {
        if result.is_success() {
            self.success_count += 1;
        } else {
            self.error_count += 1;
        }
        self.results.push(result);
    }

    pub fn success_count(&self) -> usize {
        self.success_count
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn finish(self) -> RunReport {
        RunReport {
            run_id: self.run_id,
            mode: self.mode,
            max_workers: self.max_workers,
            started_at: self.started_at,
            finished_at: Local::now(),
            wall_clock: self.clock.elapsed(),
            success_count: self.success_count,
            error_count: self.error_count,
            results: self.results,
        }
    }
}
