use std::path::Path;
use std::sync::Arc;

use serde_json::json;

use sqlload_core::config::{self, ConcurrencyMode, LoggingConfig, RunConfiguration};
use sqlload_core::error::{CliError, ConfigError};
use sqlload_core::executor::{preflight, ExecutionEngine, Scheduler};
use sqlload_core::report::ReportWriter;
use sqlload_core::source;
use sqlload_core::RunReport;
use sqlload_plugins::factory;

use crate::commands::cli::{OutputFormat, RunArgs};

/// Load the properties file and apply command line overrides on top.
pub fn load_config(path: &Path, args: &RunArgs) -> Result<RunConfiguration, CliError> {
    let mut cfg = config::load_from_path(path)?;
    apply_overrides(&mut cfg, args)?;
    Ok(cfg)
}

pub fn apply_overrides(cfg: &mut RunConfiguration, args: &RunArgs) -> Result<(), ConfigError> {
    if let Some(dir) = &args.sql_dir {
        cfg.sql_directory = dir.clone();
    }
    if let Some(dir) = &args.report_dir {
        cfg.report_directory = dir.clone();
    }
    if let Some(n) = args.max_workers {
        if n == 0 {
            return Err(ConfigError::InvalidValue {
                key: "--max-workers".to_string(),
                expected: "an integer >= 1",
                value: n.to_string(),
            });
        }
        cfg.max_workers = n;
    }
    if args.parallel {
        cfg.mode = ConcurrencyMode::Parallel;
    } else if args.serial {
        cfg.mode = ConcurrencyMode::Serial;
    }
    Ok(())
}

/// Full load run. Returns the process exit code; statement failures do not
/// change it.
pub async fn run_load(cfg: RunConfiguration, args: &RunArgs) -> Result<i32, CliError> {
    let cfg = Arc::new(cfg);
    tracing::info!(
        mode = %cfg.mode,
        max_workers = cfg.max_workers,
        sql_directory = %cfg.sql_directory.display(),
        "starting load run"
    );

    let tasks = source::load_tasks(&cfg.sql_directory).await?;

    let registry = factory::build_registry();
    let driver = preflight(&registry, cfg.clone()).await?;

    let engine = Arc::new(ExecutionEngine::new(driver, cfg.clone()));
    let mut builder = Scheduler::builder(engine).progress_bar(args.progress);
    if let Some(format) = console_format(args, &cfg.logging) {
        builder = builder.renderer(factory::build_renderer(format.as_str())?);
    }
    let report = builder.build().run(tasks).await?;

    let path = ReportWriter::new(&cfg.report_directory)
        .write(&report)
        .await?;

    if args.json {
        println!("{}", summary_json(&report, &path));
    } else {
        print_summary(&report, &path);
    }
    Ok(0)
}

/// Renderer for per-statement notices. Without `--format` the notices go
/// to the log, so plain text is used when logging is off.
pub fn console_format(args: &RunArgs, logging: &LoggingConfig) -> Option<OutputFormat> {
    match args.format {
        Some(format) => Some(format),
        None if !logging.enabled => Some(OutputFormat::Text),
        None => None,
    }
}

/// `drivers` subcommand.
pub fn list_drivers() -> i32 {
    for id in factory::build_registry().identifiers() {
        println!("{id}");
    }
    0
}

fn print_summary(report: &RunReport, path: &Path) {
    println!("=========================================================");
    println!("Total Success: {}", report.success_count);
    println!("Total Error: {}", report.error_count);
    println!("Results Written To: {}", path.display());
}

fn summary_json(report: &RunReport, path: &Path) -> String {
    let value = json!({
        "summary": report.summary(),
        "report_path": path.display().to_string(),
    });
    serde_json::to_string(&value).unwrap_or_else(|_| "{}".into())
}
