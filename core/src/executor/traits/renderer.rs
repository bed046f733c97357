use crate::config::ConcurrencyMode;
use crate::executor::types::{ExecutionResult, RunSummary};

/// Output renderer plugin (controls console output format).
pub trait OutputRendererPlugin: Send + Sync {
    fn name(&self) -> &str;
    fn format(&self) -> &str;
    fn render(&self, event: &RenderEvent);
}

/// Lifecycle events emitted by the scheduler.
#[derive(Debug, Clone)]
pub enum RenderEvent {
    RunStart {
        run_id: String,
        mode: ConcurrencyMode,
        max_workers: usize,
        total_tasks: usize,
    },
    TaskStart {
        run_id: String,
        task_id: String,
        sequence_number: usize,
    },
    TaskComplete {
        run_id: String,
        result: ExecutionResult,
    },
    RunEnd {
        run_id: String,
        summary: RunSummary,
    },
}
