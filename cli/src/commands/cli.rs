use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Ascii,
    Jsonl,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Ascii => "ascii",
            OutputFormat::Jsonl => "jsonl",
        }
    }
}

/// Run every SQL file in a directory against a database, serially or as N
/// concurrent users, and write a per-statement CSV report.
#[derive(Parser, Debug)]
#[command(name = "sqlload", version, args_conflicts_with_subcommands = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Properties file with database and run settings.
    #[arg(long, short = 'c', env = "SQLLOAD_CONFIG", default_value = sqlload_core::config::DEFAULT_CONFIG_FILE, global = true)]
    pub config: PathBuf,

    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct RunArgs {
    /// Directory of SQL files; overrides `sql_file_directory`.
    #[arg(long)]
    pub sql_dir: Option<PathBuf>,

    /// Worker pool size; overrides `parallel_execution_max_connections`.
    #[arg(long)]
    pub max_workers: Option<usize>,

    #[arg(long, conflicts_with = "serial")]
    pub parallel: bool,

    #[arg(long)]
    pub serial: bool,

    /// Where the CSV report goes; overrides `report_directory`.
    #[arg(long)]
    pub report_dir: Option<PathBuf>,

    /// Console notices per statement.
    /// - text: plain lines
    /// - ascii: plain lines with OK/FAIL status
    /// - jsonl: one JSON object per event
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Show a progress bar on stderr.
    #[arg(long)]
    pub progress: bool,

    /// Print the final summary as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List driver identifiers accepted by `jdbc_driver`.
    Drivers,
}
