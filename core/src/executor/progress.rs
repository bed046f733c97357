use std::collections::HashMap;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use super::types::format_elapsed;

/// Visual progress for a load run: one overall bar plus a spinner per
/// statement currently executing.
pub struct ProgressMonitor {
    multi: MultiProgress,
    overall: ProgressBar,
    running: HashMap<String, ProgressBar>,
    failed: usize,
    enabled: bool,
}

impl ProgressMonitor {
    /// A disabled monitor accepts every call and draws nothing.
    pub fn new(total_tasks: usize, enabled: bool) -> Self {
        if !enabled {
            return Self {
                multi: MultiProgress::new(),
                overall: ProgressBar::hidden(),
                running: HashMap::new(),
                failed: 0,
                enabled: false,
            };
        }

        let multi = MultiProgress::new();
        let overall = multi.add(ProgressBar::new(total_tasks as u64));
        overall.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} statements {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓▒░  "),
        );
        overall.set_message("starting");

        Self {
            multi,
            overall,
            running: HashMap::new(),
            failed: 0,
            enabled: true,
        }
    }

    pub fn start_task(&mut self, task_id: &str) {
        if !self.enabled {
            return;
        }

        let bar = self.multi.add(ProgressBar::new_spinner());
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("  {spinner:.green} {msg} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        bar.set_message(task_id.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        self.running.insert(task_id.to_string(), bar);
    }

    pub fn complete_task(&mut self, task_id: &str, success: bool, elapsed: Duration) {
        if !success {
            self.failed += 1;
        }
        if !self.enabled {
            return;
        }

        if let Some(bar) = self.running.remove(task_id) {
            bar.finish_and_clear();
        }
        let icon = if success { "✅" } else { "❌" };
        self.overall.set_message(format!(
            "{} {} ({}) | {} failed",
            icon,
            task_id,
            format_elapsed(elapsed),
            self.failed
        ));
        self.overall.inc(1);
    }

    /// Statements currently shown as running.
    pub fn in_flight(&self) -> usize {
        self.running.len()
    }

    pub fn finish(&self) {
        if !self.enabled {
            return;
        }
        let msg = if self.failed == 0 {
            "✅ all statements succeeded".to_string()
        } else {
            format!("❌ {} statement(s) failed", self.failed)
        };
        self.overall.finish_with_message(msg);
    }
}

impl Drop for ProgressMonitor {
    fn drop(&mut self) {
        for (_, bar) in self.running.drain() {
            bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_monitor_is_inert() {
        let mut monitor = ProgressMonitor::new(3, false);
        monitor.start_task("a.sql");
        monitor.complete_task("a.sql", false, Duration::from_secs(1));
        assert_eq!(monitor.in_flight(), 0);
        monitor.finish();
    }

    #[test]
    fn enabled_monitor_tracks_running_statements() {
        let mut monitor = ProgressMonitor::new(2, true);
        monitor.start_task("a.sql");
        monitor.start_task("b.sql");
        assert_eq!(monitor.in_flight(), 2);

        monitor.complete_task("a.sql", true, Duration::from_millis(10));
        monitor.complete_task("b.sql", false, Duration::from_millis(20));
        assert_eq!(monitor.in_flight(), 0);
        monitor.finish();
    }
}
