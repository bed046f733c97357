//! Fallback lifecycle output, used when no renderer plugin is attached.
//! Everything goes through `tracing`, so the log filter decides what shows.

use crate::config::ConcurrencyMode;

use super::types::{ExecutionResult, RunSummary};

pub fn emit_run_start(run_id: &str, mode: ConcurrencyMode, max_workers: usize, total_tasks: usize) {
    if mode.is_parallel() {
        tracing::info!(run_id, total_tasks, max_workers, "run started (parallel)");
    } else {
        tracing::info!(run_id, total_tasks, "run started (serial)");
    }
}

pub fn emit_task_start(run_id: &str, task_id: &str, sequence_number: usize) {
    tracing::debug!(run_id, task = task_id, seq = sequence_number, "task started");
}

pub fn emit_task_complete(run_id: &str, result: &ExecutionResult) {
    if result.is_success() {
        tracing::debug!(
            run_id,
            task = %result.task_identifier,
            seq = result.sequence_number,
            elapsed = %result.elapsed_display(),
            "task succeeded"
        );
    } else {
        tracing::warn!(
            run_id,
            task = %result.task_identifier,
            seq = result.sequence_number,
            error = %result.outcome.error_detail(),
            "task failed"
        );
    }
}

pub fn emit_run_end(run_id: &str, summary: &RunSummary) {
    tracing::info!(
        run_id,
        total = summary.total,
        success = summary.success_count,
        error = summary.error_count,
        wall_clock_ms = summary.wall_clock_ms,
        "run finished"
    );
}
