//! Integration tests for the backlog monitor
//!
//! Tests cover:
//! - Watermark comparison
//! - One-shot override consumption
//! - Transport failures and aborted cycles
//! - Shutdown of the run loop

use super::test_utils::{strings, Call, MemoryQueue, Reply, ScriptedService};
use concept_worker::config::MonitorConfig;
use concept_worker::locale::Locale;
use concept_worker::monitor::{BacklogMonitor, TickOutcome};
use concept_worker::pipeline::{CandidateSource, ConceptPipeline};
use concept_worker::publisher::JobPublisher;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn monitor_for(
    service: ScriptedService,
    queue: MemoryQueue,
    overrides: Vec<String>,
) -> (BacklogMonitor, Arc<ScriptedService>, Arc<MemoryQueue>) {
    let service = Arc::new(service);
    let queue = Arc::new(queue);
    let pipeline = ConceptPipeline::new(
        service.clone(),
        JobPublisher::new(queue.clone()),
        Locale::De,
    );
    let monitor = BacklogMonitor::new(queue.clone(), pipeline, overrides, MonitorConfig::default());
    (monitor, service, queue)
}

fn one_category() -> ScriptedService {
    ScriptedService::new().with_categories(Reply::Ok(strings(&["Früchte"])))
}

#[tokio::test]
async fn test_saturated_queue_generates_nothing() {
    let (monitor, service, queue) = monitor_for(one_category(), MemoryQueue::with_backlog(15), Vec::new());

    let outcome = monitor.tick().await;

    assert_eq!(outcome, TickOutcome::Saturated { depth: 15 });
    assert!(service.calls().is_empty());
    assert!(queue.published().is_empty());
}

#[tokio::test]
async fn test_below_watermark_runs_one_cycle() {
    let (monitor, service, queue) = monitor_for(one_category(), MemoryQueue::with_backlog(3), Vec::new());

    let outcome = monitor.tick().await;

    let TickOutcome::Filled { depth, report } = outcome else {
        panic!("expected a filled tick, got {outcome:?}");
    };
    assert_eq!(depth, 3);
    assert_eq!(report.enqueued, 1);
    assert_eq!(service.category_calls(), 1);
    assert_eq!(queue.published().len(), 1);
}

#[tokio::test]
async fn test_overrides_are_used_once() {
    let (monitor, service, queue) = monitor_for(
        one_category(),
        MemoryQueue::with_backlog(0),
        strings(&["TESTWORT"]),
    );

    let TickOutcome::Filled { report, .. } = monitor.tick().await else {
        panic!("expected a filled tick");
    };
    assert_eq!(report.source, CandidateSource::Override);
    assert_eq!(service.category_calls(), 0);
    assert!(monitor.pending_overrides().is_empty());

    let TickOutcome::Filled { report, .. } = monitor.tick().await else {
        panic!("expected a filled tick");
    };
    assert_eq!(report.source, CandidateSource::Generated);
    assert_eq!(service.category_calls(), 1);

    let published: Vec<String> = queue
        .published()
        .into_iter()
        .map(|concept| concept.super_solution)
        .collect();
    assert_eq!(published, strings(&["TESTWORT", "FR2CHTE"]));
}

#[tokio::test]
async fn test_overrides_are_cleared_when_every_candidate_fails() {
    let service = one_category().with_theme("TESTWORT", Reply::RequestFailure);
    let (monitor, service, queue) = monitor_for(
        service,
        MemoryQueue::with_backlog(0),
        strings(&["TESTWORT"]),
    );

    let TickOutcome::Filled { report, .. } = monitor.tick().await else {
        panic!("expected a filled tick");
    };
    assert_eq!(report.source, CandidateSource::Override);
    assert_eq!(report.enqueued, 0);
    assert!(monitor.pending_overrides().is_empty());
    assert_eq!(service.category_calls(), 0);

    monitor.tick().await;
    assert_eq!(service.category_calls(), 1);
    assert_eq!(queue.published()[0].super_solution, "FR2CHTE");
}

#[tokio::test]
async fn test_overrides_are_kept_while_queue_is_saturated() {
    let (monitor, service, _queue) = monitor_for(
        one_category(),
        MemoryQueue::with_backlog(40),
        strings(&["TESTWORT"]),
    );

    monitor.tick().await;

    assert!(!monitor.pending_overrides().is_empty());
    assert!(service.calls().is_empty());
}

#[tokio::test]
async fn test_unreachable_queue_backs_off() {
    let queue = MemoryQueue::default();
    queue.set_unreachable(true);
    let (monitor, service, _queue) = monitor_for(one_category(), queue, Vec::new());

    let outcome = monitor.tick().await;

    assert!(matches!(outcome, TickOutcome::Unreachable { .. }));
    assert_eq!(
        outcome.next_delay(&MonitorConfig::default()),
        Duration::from_secs(30)
    );
    assert!(service.calls().is_empty());
}

#[tokio::test]
async fn test_aborted_cycle_backs_off() {
    let service = ScriptedService::new().with_categories(Reply::RequestFailure);
    let (monitor, service, queue) = monitor_for(service, MemoryQueue::default(), Vec::new());

    let outcome = monitor.tick().await;

    assert!(matches!(outcome, TickOutcome::Aborted { depth: 0, .. }));
    assert_eq!(
        outcome.next_delay(&MonitorConfig::default()),
        Duration::from_secs(30)
    );
    assert_eq!(service.calls(), vec![Call::Categories(Locale::De)]);
    assert!(queue.published().is_empty());
}

#[tokio::test]
async fn test_run_returns_immediately_when_cancelled() {
    let (monitor, _service, queue) = monitor_for(one_category(), MemoryQueue::with_backlog(15), Vec::new());
    let shutdown = CancellationToken::new();
    shutdown.cancel();

    monitor.run(shutdown).await;

    assert_eq!(queue.length_queries(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_run_ticks_until_cancelled() {
    let (monitor, service, queue) = monitor_for(one_category(), MemoryQueue::with_backlog(15), Vec::new());
    let monitor = Arc::new(monitor);
    let shutdown = CancellationToken::new();

    let handle = {
        let monitor = monitor.clone();
        let shutdown = shutdown.clone();
        tokio::spawn(async move { monitor.run(shutdown).await })
    };

    tokio::time::sleep(Duration::from_secs(11)).await;
    shutdown.cancel();
    handle.await.unwrap();

    let ticks = queue.length_queries();
    assert!((2..=3).contains(&ticks), "unexpected tick count {ticks}");
    assert!(service.calls().is_empty());
}
