//! CSV run report: file naming, row layout and the writer.

mod writer;

pub use writer::ReportWriter;

use chrono::{DateTime, Local};

use crate::config::ConcurrencyMode;
use crate::executor::types::{ExecutionResult, RunReport};
use crate::util::LINE_SEPARATOR;

pub const REPORT_HEADER: &str = "SQL Filename, Status, User Name, Execution Sequence, Start Time, End Time, Elapsed Time, Stack Trace";

/// `Results_<Serial|Parallel_Threads-N>_<MMddyyyy_hhmmssAM>.csv`
pub fn report_file_name(mode: ConcurrencyMode, max_workers: usize, at: DateTime<Local>) -> String {
    format!(
        "Results_{}_{}.csv",
        mode.report_label(max_workers),
        at.format("%m%d%Y_%I%M%S%p")
    )
}

/// One data row, without the line terminator.
///
/// The last column is always quoted and starts with a space; it is empty
/// for successful statements.
pub fn format_row(result: &ExecutionResult) -> String {
    let detail = result.outcome.error_detail().replace('"', "\"\"");
    format!(
        "{},{},{},{},{},{},{},\" {}\"",
        result.task_identifier,
        result.outcome.status_label(),
        result.user_name,
        result.sequence_number,
        result.start_clock(),
        result.end_clock(),
        result.elapsed_display(),
        detail
    )
}

/// Header plus one row per result, in the order the report holds them.
pub fn render_csv(report: &RunReport) -> String {
    let mut out = String::with_capacity(REPORT_HEADER.len() + report.total() * 96);
    out.push_str(REPORT_HEADER);
    out.push_str(LINE_SEPARATOR);
    for result in &report.results {
        out.push_str(&format_row(result));
        out.push_str(LINE_SEPARATOR);
    }
    out
}
