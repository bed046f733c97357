use std::sync::{Arc, Mutex};

use futures::stream::FuturesUnordered;
use futures::StreamExt;
use tokio::sync::Semaphore;
use tokio::task::JoinError;
use uuid::Uuid;

use crate::config::ConcurrencyMode;
use crate::error::ExecutorError;

use super::aggregate::ResultAggregator;
use super::engine::ExecutionEngine;
use super::output;
use super::phase::{PhaseTracker, SchedulerPhase};
use super::progress::ProgressMonitor;
use super::traits::{OutputRendererPlugin, RenderEvent};
use super::types::{ExecutionResult, RunReport, RunSummary, SqlTask};

/// Drives a whole run: serial, or through a worker pool of `max_workers`.
///
/// Every submitted task yields exactly one result, including tasks whose
/// worker panicked. There is no per-task timeout; a statement that never
/// returns holds its worker until it does.
pub struct Scheduler {
    engine: Arc<ExecutionEngine>,
    renderer: Option<Arc<dyn OutputRendererPlugin>>,
    progress_bar: bool,
}

pub struct SchedulerBuilder {
    engine: Arc<ExecutionEngine>,
    renderer: Option<Arc<dyn OutputRendererPlugin>>,
    progress_bar: bool,
}

impl Scheduler {
    pub fn new(engine: Arc<ExecutionEngine>) -> Self {
        Self {
            engine,
            renderer: None,
            progress_bar: false,
        }
    }

    pub fn builder(engine: Arc<ExecutionEngine>) -> SchedulerBuilder {
        SchedulerBuilder::new(engine)
    }

    /// Execute every task and collect the run report.
    ///
    /// Serial mode runs tasks one by one in ascending sequence order and
    /// reports them in that order. Parallel mode submits all tasks at once
    /// and reports them in completion order.
    #[tracing::instrument(name = "scheduler.run", skip_all, fields(tasks = tasks.len()))]
    pub async fn run(&self, tasks: Vec<SqlTask>) -> Result<RunReport, ExecutorError> {
        let config = self.engine.config().clone();
        let mode = config.mode;
        let max_workers = config.max_workers;
        if max_workers == 0 {
            return Err(ExecutorError::InvalidWorkerCount(max_workers));
        }

        let mut tasks = tasks;
        tasks.sort_by_key(|t| t.sequence_number());
        let total = tasks.len();

        let run_id = Uuid::new_v4().to_string();
        let events = RunEvents {
            run_id: run_id.clone(),
            renderer: self.renderer.clone(),
        };
        let progress = Arc::new(Mutex::new(ProgressMonitor::new(total, self.progress_bar)));
        let mut aggregator = ResultAggregator::with_capacity(&run_id, mode, max_workers, total);
        let mut phase = PhaseTracker::new();

        events.run_start(mode, max_workers, total);
        phase.advance(SchedulerPhase::Dispatching)?;

        match mode {
            ConcurrencyMode::Serial => {
                self.run_serial(tasks, &events, &progress, &mut phase, &mut aggregator)
                    .await?
            }
            ConcurrencyMode::Parallel => {
                self.run_parallel(
                    tasks,
                    max_workers,
                    &events,
                    &progress,
                    &mut phase,
                    &mut aggregator,
                )
                .await?
            }
        }

        phase.advance(SchedulerPhase::Done)?;
        if let Ok(monitor) = progress.lock() {
            monitor.finish();
        }

        let report = aggregator.finish();
        if report.total() != total {
            return Err(ExecutorError::ResultCountMismatch {
                expected: total,
                actual: report.total(),
            });
        }

        events.run_end(&report.summary());
        Ok(report)
    }

    async fn run_serial(
        &self,
        tasks: Vec<SqlTask>,
        events: &RunEvents,
        progress: &Arc<Mutex<ProgressMonitor>>,
        phase: &mut PhaseTracker,
        aggregator: &mut ResultAggregator,
    ) -> Result<(), ExecutorError> {
        // Each task is dispatched and collected before the next one starts.
        phase.advance(SchedulerPhase::Collecting)?;

        for task in tasks {
            let task = Arc::new(task);
            events.task_start(&task);
            if let Ok(mut monitor) = progress.lock() {
                monitor.start_task(task.identifier());
            }

            let result = execute_blocking(self.engine.clone(), task).await;
            complete(result, events, progress, aggregator);
        }

        Ok(())
    }

    async fn run_parallel(
        &self,
        tasks: Vec<SqlTask>,
        max_workers: usize,
        events: &RunEvents,
        progress: &Arc<Mutex<ProgressMonitor>>,
        phase: &mut PhaseTracker,
        aggregator: &mut ResultAggregator,
    ) -> Result<(), ExecutorError> {
        let sem = Arc::new(Semaphore::new(max_workers));
        let mut futs: FuturesUnordered<_> = FuturesUnordered::new();

        for task in tasks {
            let sem = sem.clone();
            let engine = self.engine.clone();
            let events = events.clone();
            let progress = progress.clone();
            let task = Arc::new(task);

            futs.push(async move {
                // Held until the blocking worker has returned.
                let _permit = sem
                    .acquire_owned()
                    .await
                    .map_err(|_| ExecutorError::Runner("semaphore closed unexpectedly".into()))?;

                events.task_start(&task);
                if let Ok(mut monitor) = progress.lock() {
                    monitor.start_task(task.identifier());
                }

                Ok::<_, ExecutorError>(execute_blocking(engine, task).await)
            });
        }

        phase.advance(SchedulerPhase::Collecting)?;

        while let Some(res) = futs.next().await {
            complete(res?, events, progress, aggregator);
        }

        Ok(())
    }
}

impl SchedulerBuilder {
    pub fn new(engine: Arc<ExecutionEngine>) -> Self {
        Self {
            engine,
            renderer: None,
            progress_bar: false,
        }
    }

    pub fn renderer(mut self, renderer: Arc<dyn OutputRendererPlugin>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn progress_bar(mut self, enabled: bool) -> Self {
        self.progress_bar = enabled;
        self
    }

    pub fn build(self) -> Scheduler {
        Scheduler {
            engine: self.engine,
            renderer: self.renderer,
            progress_bar: self.progress_bar,
        }
    }
}

fn complete(
    result: ExecutionResult,
    events: &RunEvents,
    progress: &Arc<Mutex<ProgressMonitor>>,
    aggregator: &mut ResultAggregator,
) {
    events.task_complete(&result);
    if let Ok(mut monitor) = progress.lock() {
        monitor.complete_task(&result.task_identifier, result.is_success(), result.elapsed);
    }
    aggregator.record(result);
}

/// Run one task on the blocking pool. A panicking worker still yields an
/// `Error` result for its task.
async fn execute_blocking(engine: Arc<ExecutionEngine>, task: Arc<SqlTask>) -> ExecutionResult {
    let span = tracing::Span::current();
    let worker_engine = engine.clone();
    let worker_task = task.clone();

    match tokio::task::spawn_blocking(move || span.in_scope(|| worker_engine.execute(&worker_task)))
        .await
    {
        Ok(result) => result,
        Err(e) => {
            let detail = join_error_detail(e);
            tracing::error!(task = %task.identifier(), error = %detail, "worker terminated abnormally");
            engine.aborted(&task, detail)
        }
    }
}

fn join_error_detail(err: JoinError) -> String {
    if !err.is_panic() {
        return format!("worker cancelled: {err}");
    }
    let payload = err.into_panic();
    let msg = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string());
    format!("worker panicked: {msg}")
}

/// Routes lifecycle events to the renderer plugin, or to the tracing
/// fallback when none is attached.
#[derive(Clone)]
struct RunEvents {
    run_id: String,
    renderer: Option<Arc<dyn OutputRendererPlugin>>,
}

impl RunEvents {
    fn run_start(&self, mode: ConcurrencyMode, max_workers: usize, total_tasks: usize) {
        if let Some(renderer) = &self.renderer {
            renderer.render(&RenderEvent::RunStart {
                run_id: self.run_id.clone(),
                mode,
                max_workers,
                total_tasks,
            });
        } else {
            output::emit_run_start(&self.run_id, mode, max_workers, total_tasks);
        }
    }

    fn task_start(&self, task: &SqlTask) {
        if let Some(renderer) = &self.renderer {
            renderer.render(&RenderEvent::TaskStart {
                run_id: self.run_id.clone(),
                task_id: task.identifier().to_string(),
                sequence_number: task.sequence_number(),
            });
        } else {
            output::emit_task_start(&self.run_id, task.identifier(), task.sequence_number());
        }
    }

    fn task_complete(&self, result: &ExecutionResult) {
        if let Some(renderer) = &self.renderer {
            renderer.render(&RenderEvent::TaskComplete {
                run_id: self.run_id.clone(),
                result: result.clone(),
            });
        } else {
            output::emit_task_complete(&self.run_id, result);
        }
    }

    fn run_end(&self, summary: &RunSummary) {
        if let Some(renderer) = &self.renderer {
            renderer.render(&RenderEvent::RunEnd {
                run_id: self.run_id.clone(),
                summary: summary.clone(),
            });
        } else {
            output::emit_run_end(&self.run_id, summary);
        }
    }
}
