mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use calcdag::dag::Scheduler;
use calcdag::engine::Runtime;
use calcdag::types::{ExpressionStatus, TaskStatus};
use calcdag::worker::{LocalTaskSource, TaskSource, WorkerPool};
use calcdag_test_utils::builders::ConfigBuilder;
use calcdag_test_utils::fake_source::{assignment, FlakyTaskSource, RecordingTaskSource};
use calcdag_test_utils::with_timeout;
use tokio_util::sync::CancellationToken;

use common::init_tracing;

async fn wait_until(mut condition: impl FnMut() -> bool) {
    while !condition() {
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn workers_compute_and_report_failures() {
    init_tracing();
    let source = Arc::new(RecordingTaskSource::new([
        assignment("add", "+", 2.0, 3.0),
        assignment("div0", "/", 1.0, 0.0),
        assignment("mod", "%", 7.5, 2.0),
        assignment("and", "&", 1.0, 1.0),
        assignment("pow", "^", 2.0, 10.0),
    ]));

    let cancel = CancellationToken::new();
    let options = ConfigBuilder::fast().with_workers(2).worker_options();
    let pool = WorkerPool::spawn(source.clone() as Arc<dyn TaskSource>, options, &cancel);
    assert_eq!(pool.size(), 2);

    with_timeout(wait_until(|| source.reported() == 5)).await;
    assert_eq!(with_timeout(pool.shutdown()).await, 0);

    let mut results = source.results.lock().unwrap().clone();
    results.sort_by(|a, b| a.0.cmp(&b.0));
    assert_eq!(
        results,
        vec![("add".to_string(), 5.0), ("pow".to_string(), 1024.0)]
    );

    let mut failures = source.failures.lock().unwrap().clone();
    failures.sort();
    assert_eq!(
        failures,
        vec![
            ("and".to_string(), "unsupported operator: &".to_string()),
            ("div0".to_string(), "division by zero".to_string()),
            (
                "mod".to_string(),
                "modulo operation requires integer operands".to_string()
            ),
        ]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn pool_survives_transient_pull_errors() {
    init_tracing();
    let scheduler = Arc::new(Scheduler::in_memory());
    let id = scheduler.submit_expression("(2+3)*4").unwrap();

    let local: Arc<dyn TaskSource> = Arc::new(LocalTaskSource::new(Arc::clone(&scheduler)));
    let flaky = Arc::new(FlakyTaskSource::new(local, 5, 0));

    let cancel = CancellationToken::new();
    let options = ConfigBuilder::fast().with_workers(2).worker_options();
    let pool = WorkerPool::spawn(flaky.clone() as Arc<dyn TaskSource>, options, &cancel);

    with_timeout(wait_until(|| {
        scheduler.get_expression(&id).unwrap().status.is_terminal()
    }))
    .await;
    pool.shutdown().await;

    assert_eq!(flaky.injected.load(Ordering::SeqCst), 5);
    let expression = scheduler.get_expression(&id).unwrap();
    assert_eq!(expression.status, ExpressionStatus::Complete);
    assert_eq!(expression.result, Some(20.0));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn cancellation_leaves_in_flight_task_running() {
    init_tracing();
    let scheduler = Arc::new(Scheduler::in_memory());
    let id = scheduler.submit_expression("1+1").unwrap();

    let source: Arc<dyn TaskSource> = Arc::new(LocalTaskSource::new(Arc::clone(&scheduler)));
    let options = ConfigBuilder::fast()
        .with_latency("10s")
        .with_workers(1)
        .worker_options();
    let cancel = CancellationToken::new();
    let pool = WorkerPool::spawn(source, options, &cancel);

    with_timeout(wait_until(|| {
        scheduler
            .tasks_for_expression(&id)
            .unwrap()
            .iter()
            .any(|t| t.status == TaskStatus::Running)
    }))
    .await;

    // Shutdown must not wait out the 10s latency.
    assert_eq!(with_timeout(pool.shutdown()).await, 0);

    let task = scheduler.tasks_for_expression(&id).unwrap().remove(0);
    assert_eq!(task.status, TaskStatus::Running);
    assert_eq!(
        scheduler.get_expression(&id).unwrap().status,
        ExpressionStatus::InProgress
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn parent_token_stops_pool() {
    init_tracing();
    let source = Arc::new(RecordingTaskSource::default());
    let cancel = CancellationToken::new();
    let pool = WorkerPool::spawn(
        source.clone() as Arc<dyn TaskSource>,
        ConfigBuilder::fast().with_workers(3).worker_options(),
        &cancel,
    );

    with_timeout(wait_until(|| source.pulls.load(Ordering::SeqCst) >= 3)).await;
    cancel.cancel();
    assert!(pool.cancellation_token().is_cancelled());
    assert_eq!(with_timeout(pool.shutdown()).await, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn runtime_evaluates_many_expressions() {
    init_tracing();
    let cfg = ConfigBuilder::fast().with_workers(4).build();
    let cancel = CancellationToken::new();
    let mut runtime = Runtime::from_config(&cfg, cancel.clone());

    let cases = [
        ("2+2", Some(4.0)),
        ("(2+3)*4", Some(20.0)),
        ("2+3*4", Some(14.0)),
        ("(1+2)*(3+4)-5/5", Some(20.0)),
        ("5/0", None),
    ];
    let ids: Vec<_> = cases
        .iter()
        .map(|(text, _)| runtime.submit(text).unwrap())
        .collect();
    assert!(runtime.submit("2++2").is_err());

    runtime.start();
    runtime.start();
    assert!(runtime.is_started());

    let finished = with_timeout(runtime.wait_for(&ids)).await.unwrap();
    for ((text, expected), expression) in cases.iter().zip(&finished) {
        assert_eq!(&expression.text, text);
        match expected {
            Some(value) => {
                assert_eq!(expression.status, ExpressionStatus::Complete, "{text}");
                assert_eq!(expression.result, Some(*value), "{text}");
            }
            None => {
                assert_eq!(expression.status, ExpressionStatus::Error, "{text}");
                assert_eq!(expression.error.as_deref(), Some("division by zero"));
            }
        }
    }

    assert_eq!(with_timeout(runtime.shutdown()).await, 0);
}

#[tokio::test]
async fn wait_for_returns_on_cancel() {
    init_tracing();
    let cfg = ConfigBuilder::fast().build();
    let cancel = CancellationToken::new();
    let runtime = Runtime::from_config(&cfg, cancel.clone());
    let id = runtime.submit("1+1").unwrap();

    // No workers started: the expression can only stay in progress.
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let snapshot = with_timeout(runtime.wait_for(&[id])).await.unwrap();
    assert_eq!(snapshot[0].status, ExpressionStatus::InProgress);
    assert_eq!(runtime.shutdown().await, 0);
}
