//! sqlload core: reads SQL statement files, runs them serially or through a
//! bounded worker pool, and reports per-statement timing and status.
//!
//! # Architecture
//!
//! ```text
//! config.props ──► config::load_from_path() ──► RunConfiguration
//!                                                   │
//! sql directory ──► source::load_tasks() ──► Vec<SqlTask>
//!                                                   │
//!                    executor::preflight() ◄────────┤
//!                                                   ▼
//!                 Scheduler::run() ──► ExecutionEngine::execute() (per task)
//!                                                   │
//!                 ResultAggregator ──► RunReport ──► report::ReportWriter
//! ```

pub mod config;
pub mod error;
pub mod executor;
pub mod report;
pub mod source;
pub mod util;

pub use config::{ConcurrencyMode, DatabaseConfig, LoggingConfig, RunConfiguration};
pub use executor::types::{ExecutionResult, RunReport, SqlTask, TaskOutcome};
