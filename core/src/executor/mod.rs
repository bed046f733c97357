//! Concurrent SQL execution.
//!
//! # Architecture
//!
//! ```text
//! Vec<SqlTask>
//!   ↓
//! Scheduler::run()            Idle → Dispatching → Collecting → Done
//!   ├─ serial:   one task at a time, sequence order
//!   └─ parallel: Semaphore(max_workers) + FuturesUnordered
//!   ↓
//! ExecutionEngine::execute()  (spawn_blocking, one connection per task)
//!   ↓
//! ExecutionResult ─► ResultAggregator ─► RunReport
//! ```

mod aggregate;
mod engine;
mod output;
pub mod phase;
mod preflight;
mod progress;
mod scheduler;
pub mod traits;
pub mod types;

pub use aggregate::ResultAggregator;
pub use engine::ExecutionEngine;
pub use phase::{PhaseTracker, SchedulerPhase};
pub use preflight::preflight;
pub use progress::ProgressMonitor;
pub use scheduler::{Scheduler, SchedulerBuilder};
pub use traits::{
    DatabaseConnection, DatabaseDriver, DriverRegistry, OutputRendererPlugin, RenderEvent,
};
pub use types::{ExecutionResult, RunReport, RunSummary, SqlTask, TaskOutcome};
