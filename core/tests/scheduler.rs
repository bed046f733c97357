mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{config, init_tracing, tasks, CountingDriver, RecordingRenderer, UnreachableDriver};
use pretty_assertions::assert_eq;
use sqlload_core::config::ConcurrencyMode;
use sqlload_core::error::ExecutorError;
use sqlload_core::executor::types::{DriverError, SqlTask};
use sqlload_core::executor::{preflight, DriverRegistry, ExecutionEngine, RenderEvent, Scheduler};

fn scheduler(driver: &CountingDriver, mode: ConcurrencyMode, max_workers: usize) -> Scheduler {
    let engine = ExecutionEngine::new(Arc::new(driver.clone()), config(mode, max_workers));
    Scheduler::new(Arc::new(engine))
}

fn sequence_numbers(report: &sqlload_core::RunReport) -> Vec<usize> {
    report.results.iter().map(|r| r.sequence_number).collect()
}

#[tokio::test]
async fn serial_run_reports_in_submission_order() {
    init_tracing();
    let driver = CountingDriver::new(Duration::from_millis(5));
    let mut input = tasks(4);
    input.reverse();

    let report = scheduler(&driver, ConcurrencyMode::Serial, 3)
        .run(input)
        .await
        .unwrap();

    assert_eq!(sequence_numbers(&report), vec![1, 2, 3, 4]);
    assert_eq!(driver.peak(), 1);
    assert_eq!(
        driver.executed(),
        vec!["SELECT 1", "SELECT 2", "SELECT 3", "SELECT 4"]
    );
    assert_eq!(report.report_label(), "Serial");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_run_never_exceeds_max_workers() {
    let driver = CountingDriver::new(Duration::from_millis(40));

    let report = scheduler(&driver, ConcurrencyMode::Parallel, 2)
        .run(tasks(5))
        .await
        .unwrap();

    assert_eq!(report.total(), 5);
    assert_eq!(report.success_count + report.error_count, 5);
    assert!(driver.peak() <= 2, "peak concurrency was {}", driver.peak());
    assert_eq!(report.report_label(), "Parallel_Threads-2");

    let mut seqs = sequence_numbers(&report);
    seqs.sort_unstable();
    assert_eq!(seqs, vec![1, 2, 3, 4, 5]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_run_uses_more_than_one_worker() {
    let driver = CountingDriver::new(Duration::from_millis(80));

    scheduler(&driver, ConcurrencyMode::Parallel, 3)
        .run(tasks(6))
        .await
        .unwrap();

    assert!(driver.peak() >= 2, "peak concurrency was {}", driver.peak());
    assert!(driver.peak() <= 3);
}

#[tokio::test]
async fn failing_statement_does_not_affect_siblings() {
    let driver = CountingDriver::new(Duration::from_millis(1));
    let input = vec![
        SqlTask::new("a.sql", 1, "SELECT 1"),
        SqlTask::new("b.sql", 2, "SELECT * FROM not_a_table"),
        SqlTask::new("c.sql", 3, "SELECT 3"),
    ];

    for mode in [ConcurrencyMode::Serial, ConcurrencyMode::Parallel] {
        let report = scheduler(&driver, mode, 2).run(input.clone()).await.unwrap();

        assert_eq!(report.success_count, 2);
        assert_eq!(report.error_count, 1);
        let ordered = report.results_by_sequence();
        assert!(ordered[0].is_success());
        assert!(!ordered[1].is_success());
        assert!(ordered[1].outcome.error_detail().contains("not_a_table"));
        assert!(ordered[2].is_success());
    }
}

#[tokio::test]
async fn panicking_worker_still_yields_a_result() {
    init_tracing();
    let driver = CountingDriver::new(Duration::from_millis(1));
    let input = vec![
        SqlTask::new("a.sql", 1, "SELECT 1"),
        SqlTask::new("b.sql", 2, "SELECT panic_now"),
        SqlTask::new("c.sql", 3, "SELECT 3"),
    ];

    for mode in [ConcurrencyMode::Serial, ConcurrencyMode::Parallel] {
        let report = scheduler(&driver, mode, 2).run(input.clone()).await.unwrap();

        assert_eq!(report.total(), 3);
        assert_eq!(report.error_count, 1);
        let crashed = report
            .results
            .iter()
            .find(|r| r.task_identifier == "b.sql")
            .unwrap();
        assert!(crashed.outcome.error_detail().contains("worker panicked"));
        assert_eq!(crashed.user_name, "loader");
    }
}

#[tokio::test]
async fn empty_task_set_is_not_an_error() {
    let driver = CountingDriver::new(Duration::ZERO);

    for mode in [ConcurrencyMode::Serial, ConcurrencyMode::Parallel] {
        let report = scheduler(&driver, mode, 4).run(Vec::new()).await.unwrap();
        assert_eq!(report.total(), 0);
        assert_eq!(report.success_count, 0);
        assert_eq!(report.error_count, 0);
    }
}

#[tokio::test]
async fn zero_workers_is_rejected() {
    let driver = CountingDriver::new(Duration::ZERO);
    let err = scheduler(&driver, ConcurrencyMode::Parallel, 0)
        .run(tasks(2))
        .await
        .unwrap_err();
    assert!(matches!(err, ExecutorError::InvalidWorkerCount(0)));
    assert!(driver.executed().is_empty());
}

#[tokio::test]
async fn repeated_runs_yield_identical_totals() {
    let driver = CountingDriver::new(Duration::from_millis(2));
    let mut input = tasks(6);
    input.push(SqlTask::new("007.sql", 7, "SELECT * FROM not_a_table"));

    for mode in [ConcurrencyMode::Serial, ConcurrencyMode::Parallel] {
        let sched = scheduler(&driver, mode, 3);
        let first = sched.run(input.clone()).await.unwrap();
        let second = sched.run(input.clone()).await.unwrap();

        assert_eq!(first.success_count, second.success_count);
        assert_eq!(first.error_count, second.error_count);
        assert_ne!(first.run_id, second.run_id);
        if mode == ConcurrencyMode::Serial {
            assert_eq!(sequence_numbers(&first), sequence_numbers(&second));
        }
    }
}

#[tokio::test]
async fn renderer_sees_every_lifecycle_event() {
    let driver = CountingDriver::new(Duration::from_millis(1));
    let renderer = Arc::new(RecordingRenderer::default());
    let engine = ExecutionEngine::new(
        Arc::new(driver.clone()),
        config(ConcurrencyMode::Parallel, 2),
    );
    let sched = Scheduler::builder(Arc::new(engine))
        .renderer(renderer.clone())
        .progress_bar(false)
        .build();

    let report = sched.run(tasks(3)).await.unwrap();
    let events = renderer.events();

    assert_eq!(events.len(), 1 + 3 + 3 + 1);
    assert!(matches!(
        events.first(),
        Some(RenderEvent::RunStart { total_tasks: 3, max_workers: 2, .. })
    ));
    match events.last() {
        Some(RenderEvent::RunEnd { run_id, summary }) => {
            assert_eq!(run_id, &report.run_id);
            assert_eq!(summary.total, 3);
            assert_eq!(summary.success_count, 3);
        }
        other => panic!("unexpected last event: {other:?}"),
    }
    let completed = events
        .iter()
        .filter(|e| matches!(e, RenderEvent::TaskComplete { .. }))
        .count();
    assert_eq!(completed, 3);
}

#[tokio::test]
async fn connect_failure_is_reported_per_task() {
    let engine = ExecutionEngine::new(
        Arc::new(UnreachableDriver),
        config(ConcurrencyMode::Serial, 1),
    );
    let report = Scheduler::new(Arc::new(engine)).run(tasks(2)).await.unwrap();

    assert_eq!(report.error_count, 2);
    assert!(report
        .results
        .iter()
        .all(|r| r.outcome.error_detail().contains("connection refused")));
}

#[tokio::test]
async fn preflight_resolves_registered_driver() {
    let mut registry = DriverRegistry::new();
    registry.register(Arc::new(CountingDriver::new(Duration::ZERO)));

    let driver = preflight(&registry, config(ConcurrencyMode::Serial, 1))
        .await
        .unwrap();
    assert_eq!(driver.name(), "fake");
}

#[tokio::test]
async fn preflight_rejects_unknown_and_unreachable_drivers() {
    let empty = DriverRegistry::new();
    let err = preflight(&empty, config(ConcurrencyMode::Serial, 1))
        .await
        .err()
        .unwrap();
    assert!(matches!(
        err,
        ExecutorError::Driver(DriverError::NotFound { .. })
    ));

    let mut registry = DriverRegistry::new();
    registry.register(Arc::new(UnreachableDriver));
    let mut cfg = (*config(ConcurrencyMode::Serial, 1)).clone();
    cfg.database.driver = "unreachable".into();
    let err = preflight(&registry, Arc::new(cfg)).await.err().unwrap();
    assert!(matches!(err, ExecutorError::Driver(DriverError::Connect { .. })));
}
