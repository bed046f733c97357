use sqlload_core::executor::traits::{OutputRendererPlugin, RenderEvent};

/// Console notices, one line per lifecycle event.
pub struct TextRendererPlugin {
    ascii_only: bool,
}

impl TextRendererPlugin {
    pub fn new(ascii_only: bool) -> Self {
        Self { ascii_only }
    }

    fn format_event(&self, event: &RenderEvent) -> String {
        match event {
            RenderEvent::RunStart {
                run_id,
                mode,
                max_workers,
                total_tasks,
            } => {
                if mode.is_parallel() {
                    format!(
                        "RUN START {} ({} statements, parallel, {} workers)",
                        run_id, total_tasks, max_workers
                    )
                } else {
                    format!("RUN START {} ({} statements, serial)", run_id, total_tasks)
                }
            }
            RenderEvent::TaskStart {
                run_id,
                task_id,
                sequence_number,
            } => format!(
                "EXECUTING SQL FOR FILE {} ({} #{})",
                task_id, run_id, sequence_number
            ),
            RenderEvent::TaskComplete { run_id, result } => {
                let status = match (result.is_success(), self.ascii_only) {
                    (true, true) => "OK",
                    (true, false) => "SUCCESS",
                    (false, true) => "FAIL",
                    (false, false) => "ERROR",
                };
                let mut line = format!(
                    "END SQL EXECUTION FOR FILE {} ({} #{}, status {}, {} - {}, elapsed {})",
                    result.task_identifier,
                    run_id,
                    result.sequence_number,
                    status,
                    result.start_clock(),
                    result.end_clock(),
                    result.elapsed_display()
                );
                if !result.is_success() {
                    line.push_str(&format!(": {}", result.outcome.error_detail()));
                }
                line
            }
            RenderEvent::RunEnd { run_id, summary } => format!(
                "RUN END {} (success {}, error {}, wall clock {}ms)",
                run_id, summary.success_count, summary.error_count, summary.wall_clock_ms
            ),
        }
    }
}

impl OutputRendererPlugin for TextRendererPlugin {
    fn name(&self) -> &str {
        "text-renderer"
    }

    fn format(&self) -> &str {
        "text"
    }

    fn render(&self, event: &RenderEvent) {
        println!("{}", self.format_event(event));
    }
}
