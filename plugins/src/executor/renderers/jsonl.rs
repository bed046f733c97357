use chrono::Local;
use serde_json::{json, Value};
use sqlload_core::executor::traits::{OutputRendererPlugin, RenderEvent};

/// One JSON object per lifecycle event on stdout.
#[derive(Default)]
pub struct JsonlRendererPlugin;

impl JsonlRendererPlugin {
    pub fn new() -> Self {
        Self
    }

    fn event_to_json(&self, event: &RenderEvent) -> Value {
        let ts = Local::now().to_rfc3339();
        match event {
            RenderEvent::RunStart {
                run_id,
                mode,
                max_workers,
                total_tasks,
            } => json!({
                "v": 1,
                "event_type": "run.start",
                "ts": ts,
                "run_id": run_id,
                "metadata": {
                    "mode": mode,
                    "max_workers": max_workers,
                    "total_tasks": total_tasks,
                }
            }),
            RenderEvent::TaskStart {
                run_id,
                task_id,
                sequence_number,
            } => json!({
                "v": 1,
                "event_type": "task.start",
                "ts": ts,
                "run_id": run_id,
                "task_id": task_id,
                "metadata": {
                    "sequence_number": sequence_number,
                }
            }),
            RenderEvent::TaskComplete { run_id, result } => json!({
                "v": 1,
                "event_type": "task.end",
                "ts": ts,
                "run_id": run_id,
                "task_id": result.task_identifier,
                "metadata": serde_json::to_value(result).unwrap_or(Value::Null),
            }),
            RenderEvent::RunEnd { run_id, summary } => json!({
                "v": 1,
                "event_type": "run.end",
                "ts": ts,
                "run_id": run_id,
                "metadata": serde_json::to_value(summary).unwrap_or(Value::Null),
            }),
        }
    }
}

impl OutputRendererPlugin for JsonlRendererPlugin {
    fn name(&self) -> &str {
        "jsonl-renderer"
    }

    fn format(&self) -> &str {
        "jsonl"
    }

    fn render(&self, event: &RenderEvent) {
        let value = self.event_to_json(event);
        println!("{}", serde_json::to_string(&value).unwrap_or_else(|_| "{}".into()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlload_core::executor::types::{ExecutionResult, RunSummary, SqlTask, Stopwatch, TaskOutcome};
    use sqlload_core::ConcurrencyMode;

    #[test]
    fn test_jsonl_renderer_event_type() {
        let renderer = JsonlRendererPlugin::new();
        let value = renderer.event_to_json(&RenderEvent::RunStart {
            run_id: "run".to_string(),
            mode: ConcurrencyMode::Serial,
            max_workers: 1,
            total_tasks: 2,
        });
        assert_eq!(value["event_type"], "run.start");
        assert_eq!(value["metadata"]["mode"], "serial");
    }

    #[test]
    fn test_jsonl_renderer_task_complete() {
        let renderer = JsonlRendererPlugin::new();
        let task = SqlTask::new("b.sql", 2, "SELECT * FROM not_a_table");
        let result = ExecutionResult::new(
            &task,
            "loader",
            TaskOutcome::error("no such table"),
            Stopwatch::start().stop(),
        );

        let value = renderer.event_to_json(&RenderEvent::TaskComplete {
            run_id: "run".to_string(),
            result,
        });
        assert_eq!(value["event_type"], "task.end");
        assert_eq!(value["task_id"], "b.sql");
        assert_eq!(value["metadata"]["status"], "error");
        assert_eq!(value["metadata"]["sequence_number"], 2);
    }

    #[test]
    fn test_jsonl_renderer_run_end() {
        let renderer = JsonlRendererPlugin::new();
        let value = renderer.event_to_json(&RenderEvent::RunEnd {
            run_id: "run".to_string(),
            summary: RunSummary {
                run_id: "run".to_string(),
                mode: ConcurrencyMode::Parallel,
                max_workers: 2,
                total: 3,
                success_count: 2,
                error_count: 1,
                wall_clock_ms: 100,
            },
        });
        assert_eq!(value["metadata"]["total"], 3);
        assert_eq!(value["metadata"]["error_count"], 1);
    }
}
