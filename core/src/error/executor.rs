use thiserror::Error;

use crate::executor::phase::TransitionError;
use crate::executor::types::DriverError;

/// Run-level errors raised by the scheduler and preflight.
///
/// A failing statement is never one of these; it becomes an `Error`
/// outcome on its `ExecutionResult` instead.
#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("max workers must be at least 1, got {0}")]
    InvalidWorkerCount(usize),

    #[error("{0}")]
    Driver(#[from] DriverError),

    #[error("scheduler state error: {0}")]
    Phase(#[from] TransitionError),

    #[error("result count mismatch: {expected} tasks submitted, {actual} results collected")]
    ResultCountMismatch { expected: usize, actual: usize },

    #[error("Runner error: {0}")]
    Runner(String),
}
