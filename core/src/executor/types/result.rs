use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use serde::{Serialize, Serializer};

use crate::config::ConcurrencyMode;

use super::task::SqlTask;

/// Outcome of one statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TaskOutcome {
    Success,
    Error { detail: String },
}

impl TaskOutcome {
    pub fn error(detail: impl Into<String>) -> Self {
        Self::Error {
            detail: detail.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Status column value: `success` or `error`.
    pub fn status_label(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error { .. } => "error",
        }
    }

    /// Failure description; empty on success.
    pub fn error_detail(&self) -> &str {
        match self {
            Self::Success => "",
            Self::Error { detail } => detail,
        }
    }
}

/// Wall-clock start/end of a statement plus the monotonic elapsed time
/// between the same two points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
    pub elapsed: Duration,
}

pub struct Stopwatch {
    started_at: DateTime<Local>,
    clock: Instant,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self {
            started_at: Local::now(),
            clock: Instant::now(),
        }
    }

    pub fn stop(self) -> Timing {
        let elapsed = self.clock.elapsed();
        Timing {
            start: self.started_at,
            end: Local::now(),
            elapsed,
        }
    }
}

/// Result of executing a single task. Exactly one exists per task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionResult {
    pub task_identifier: String,

    pub sequence_number: usize,

    #[serde(flatten)]
    pub outcome: TaskOutcome,

    /// Database principal the connection was opened as.
    pub user_name: String,

    pub start_time: DateTime<Local>,

    pub end_time: DateTime<Local>,

    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

impl ExecutionResult {
    pub fn new(
        task: &SqlTask,
        user_name: impl Into<String>,
        outcome: TaskOutcome,
        timing: Timing,
    ) -> Self {
        Self {
            task_identifier: task.identifier().to_string(),
            sequence_number: task.sequence_number(),
            outcome,
            user_name: user_name.into(),
            start_time: timing.start,
            end_time: timing.end,
            elapsed: timing.elapsed,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }

    /// Start time as `HH:MM:SS`.
    pub fn start_clock(&self) -> String {
        self.start_time.format("%H:%M:%S").to_string()
    }

    /// End time as `HH:MM:SS`.
    pub fn end_clock(&self) -> String {
        self.end_time.format("%H:%M:%S").to_string()
    }

    pub fn elapsed_display(&self) -> String {
        format_elapsed(self.elapsed)
    }
}

/// Formats a duration as `HH:MM:SS`. Hours are unbounded; the sub-second
/// remainder is truncated.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!(
        "{:02}:{:02}:{:02}",
        secs / 3600,
        (secs / 60) % 60,
        secs % 60
    )
}

fn serialize_millis<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

/// All results of one run plus derived totals.
///
/// `results` keeps the order results became available in; use
/// [`RunReport::results_by_sequence`] to recover submission order.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub mode: ConcurrencyMode,
    pub max_workers: usize,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    #[serde(rename = "wall_clock_ms", serialize_with = "serialize_millis")]
    pub wall_clock: Duration,
    pub success_count: usize,
    pub error_count: usize,
    pub results: Vec<ExecutionResult>,
}

impl RunReport {
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// `Serial` or `Parallel_Threads-<max_workers>`.
    pub fn report_label(&self) -> String {
        self.mode.report_label(self.max_workers)
    }

    pub fn results_by_sequence(&self) -> Vec<&ExecutionResult> {
        let mut ordered: Vec<&ExecutionResult> = self.results.iter().collect();
        ordered.sort_by_key(|r| r.sequence_number);
        ordered
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            run_id: self.run_id.clone(),
            mode: self.mode,
            max_workers: self.max_workers,
            total: self.total(),
            success_count: self.success_count,
            error_count: self.error_count,
            wall_clock_ms: self.wall_clock.as_millis() as u64,
        }
    }
}

/// Totals-only view of a [`RunReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    pub mode: ConcurrencyMode,
    pub max_workers: usize,
    pub total: usize,
    pub success_count: usize,
    pub error_count: usize,
    pub wall_clock_ms: u64,
}
