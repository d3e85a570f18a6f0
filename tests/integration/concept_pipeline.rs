//! Integration tests for the production cycle
//!
//! Tests cover:
//! - Override candidates replacing category generation
//! - Candidate and word-pool filtering
//! - Per-candidate failure isolation
//! - Fatal and non-fatal category failures

use super::test_utils::{strings, Call, MemoryQueue, Reply, ScriptedService};
use concept_worker::error::{CycleError, Stage};
use concept_worker::locale::Locale;
use concept_worker::pipeline::{CandidateSource, ConceptPipeline};
use concept_worker::publisher::{JobPublisher, NEW_JOB_TYPE};
use std::sync::Arc;

fn pipeline_for(
    service: ScriptedService,
    locale: Locale,
) -> (ConceptPipeline, Arc<ScriptedService>, Arc<MemoryQueue>) {
    let service = Arc::new(service);
    let queue = Arc::new(MemoryQueue::default());
    let pipeline = ConceptPipeline::new(service.clone(), JobPublisher::new(queue.clone()), locale);
    (pipeline, service, queue)
}

#[tokio::test]
async fn test_override_candidate_end_to_end() {
    let (pipeline, service, queue) = pipeline_for(ScriptedService::new(), Locale::De);

    let report = pipeline.run(strings(&["TESTWORT"])).await.unwrap();

    assert_eq!(report.source, CandidateSource::Override);
    assert_eq!(report.candidates, strings(&["TESTWORT"]));
    assert_eq!(report.enqueued, 1);
    assert_eq!(
        service.calls(),
        vec![
            Call::Theme("TESTWORT".to_string()),
            Call::WordPool("TESTWORT".to_string())
        ]
    );

    let jobs = queue.jobs();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].job_type, NEW_JOB_TYPE);
    let payload: serde_json::Value = serde_json::from_str(&jobs[0].payload).unwrap();
    assert_eq!(
        payload,
        serde_json::json!({
            "superSolution": "TESTWORT",
            "themeDescription": "Rätsel",
            "wordPool": ["EINS", "ZWEI", "DREI", "VIER"]
        })
    );
}

#[tokio::test]
async fn test_override_is_encoded_and_decoded_for_prompts() {
    let (pipeline, service, queue) = pipeline_for(ScriptedService::new(), Locale::De);

    let report = pipeline.run(strings(&["Süßwasserfische"])).await.unwrap();

    assert_eq!(report.candidates, strings(&["S23WASSERFISCHE"]));
    assert_eq!(service.calls()[0], Call::Theme("SÜẞWASSERFISCHE".to_string()));
    assert_eq!(queue.published()[0].super_solution, "S23WASSERFISCHE");
}

#[tokio::test]
async fn test_override_with_digits_is_dropped() {
    let (pipeline, service, queue) = pipeline_for(ScriptedService::new(), Locale::De);

    let report = pipeline
        .run(strings(&["Formel1", "TESTWORT"]))
        .await
        .unwrap();

    assert_eq!(report.source, CandidateSource::Override);
    assert_eq!(report.candidates, strings(&["TESTWORT"]));
    assert!(!service
        .calls()
        .iter()
        .any(|call| matches!(call, Call::Theme(c) | Call::WordPool(c) if c.starts_with("FORMEL"))));
    let published: Vec<String> = queue
        .published()
        .into_iter()
        .map(|concept| concept.super_solution)
        .collect();
    assert_eq!(published, strings(&["TESTWORT"]));
}

#[tokio::test]
async fn test_word_pool_is_filtered_and_deduplicated() {
    let service = ScriptedService::new().with_pool(
        "TESTWORT",
        Reply::Ok(strings(&["EINS", "EIN", "EINS", "AB"])),
    );
    let (pipeline, _service, queue) = pipeline_for(service, Locale::De);

    pipeline.run(strings(&["TESTWORT"])).await.unwrap();

    assert_eq!(queue.published()[0].word_pool, strings(&["EINS"]));
}

#[tokio::test]
async fn test_word_pool_drops_digits_and_encodes_umlauts() {
    let service = ScriptedService::new().with_pool(
        "TESTWORT",
        Reply::Ok(strings(&["Forelle", "Aal", "Hecht", "forelle", "Zander 2", "Äsche"])),
    );
    let (pipeline, _service, queue) = pipeline_for(service, Locale::De);

    pipeline.run(strings(&["TESTWORT"])).await.unwrap();

    assert_eq!(
        queue.published()[0].word_pool,
        strings(&["FORELLE", "HECHT", "0SCHE"])
    );
}

#[tokio::test]
async fn test_generated_candidates_are_bounded_and_unique() {
    let service = ScriptedService::new().with_categories(Reply::Ok(strings(&[
        "Obst",
        "Zweiundzwanzig Tiere",
        "Top 10 Filme",
        "Süßwasserfische",
        "Berühmte Persönlichkeiten der Weltgeschichte",
        "Süßwasserfische",
    ])));
    let (pipeline, service, queue) = pipeline_for(service, Locale::De);

    let report = pipeline.run(Vec::new()).await.unwrap();

    assert_eq!(report.source, CandidateSource::Generated);
    assert_eq!(
        report.candidates,
        strings(&["ZWEIUNDZWANZIGTIERE", "S23WASSERFISCHE"])
    );
    assert_eq!(service.category_calls(), 1);
    let published: Vec<String> = queue
        .published()
        .into_iter()
        .map(|concept| concept.super_solution)
        .collect();
    assert_eq!(published, report.candidates);
}

#[tokio::test]
async fn test_swedish_candidates_keep_ring_letter() {
    let service =
        ScriptedService::new().with_categories(Reply::Ok(strings(&["Fåglar i skogen"])));
    let (pipeline, service, queue) = pipeline_for(service, Locale::Sv);

    let report = pipeline.run(Vec::new()).await.unwrap();

    assert_eq!(report.candidates, strings(&["FÅGLARISKOGEN"]));
    assert!(service
        .calls()
        .contains(&Call::Theme("FÅGLARISKOGEN".to_string())));
    assert_eq!(queue.published()[0].super_solution, "FÅGLARISKOGEN");
}

#[tokio::test]
async fn test_theme_failure_skips_only_that_candidate() {
    let service = ScriptedService::new()
        .with_categories(Reply::Ok(strings(&["Früchte", "Gemüsesorten", "Getränke"])))
        .with_theme("GEMÜSESORTEN", Reply::RequestFailure);
    let (pipeline, service, queue) = pipeline_for(service, Locale::De);

    let report = pipeline.run(Vec::new()).await.unwrap();

    assert_eq!(report.enqueued, 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].candidate, "GEM2SESORTEN");
    assert_eq!(report.skipped[0].stage, Stage::Theme);
    assert!(!service
        .calls()
        .contains(&Call::WordPool("GEMÜSESORTEN".to_string())));

    let published: Vec<String> = queue
        .published()
        .into_iter()
        .map(|concept| concept.super_solution)
        .collect();
    assert_eq!(published, strings(&["FR2CHTE", "GETR0NKE"]));
}

#[tokio::test]
async fn test_unparseable_word_pool_skips_candidate() {
    let service = ScriptedService::new()
        .with_categories(Reply::Ok(strings(&["Früchte", "Getränke"])))
        .with_pool("FRÜCHTE", Reply::ParseFailure);
    let (pipeline, _service, queue) = pipeline_for(service, Locale::De);

    let report = pipeline.run(Vec::new()).await.unwrap();

    assert_eq!(report.enqueued, 1);
    assert_eq!(report.skipped[0].candidate, "FR2CHTE");
    assert_eq!(report.skipped[0].stage, Stage::WordPool);
    assert_eq!(queue.published()[0].super_solution, "GETR0NKE");
}

#[tokio::test]
async fn test_fully_filtered_word_pool_skips_candidate() {
    let service = ScriptedService::new().with_pool("TESTWORT", Reply::Ok(strings(&["AB", "CD"])));
    let (pipeline, _service, queue) = pipeline_for(service, Locale::De);

    let report = pipeline.run(strings(&["TESTWORT"])).await.unwrap();

    assert_eq!(report.enqueued, 0);
    assert_eq!(report.skipped[0].stage, Stage::WordPool);
    assert!(queue.published().is_empty());
}

#[tokio::test]
async fn test_word_pool_request_failure_skips_candidate() {
    let service = ScriptedService::new().with_pool("TESTWORT", Reply::RequestFailure);
    let (pipeline, _service, queue) = pipeline_for(service, Locale::De);

    let report = pipeline.run(strings(&["TESTWORT", "ANDERESWORT"])).await.unwrap();

    assert_eq!(report.enqueued, 1);
    assert_eq!(report.skipped[0].stage, Stage::WordPool);
    assert_eq!(queue.published()[0].super_solution, "ANDERESWORT");
}

#[tokio::test]
async fn test_category_request_failure_aborts_cycle() {
    let service = ScriptedService::new().with_categories(Reply::RequestFailure);
    let (pipeline, service, queue) = pipeline_for(service, Locale::De);

    let err = pipeline.run(Vec::new()).await.unwrap_err();

    assert!(matches!(err, CycleError::Candidates(_)));
    assert_eq!(service.calls(), vec![Call::Categories(Locale::De)]);
    assert!(queue.published().is_empty());
}

#[tokio::test]
async fn test_category_parse_failure_is_an_empty_cycle() {
    let service = ScriptedService::new().with_categories(Reply::ParseFailure);
    let (pipeline, service, queue) = pipeline_for(service, Locale::De);

    let report = pipeline.run(Vec::new()).await.unwrap();

    assert!(report.candidates.is_empty());
    assert!(report.candidate_parse_error.is_some());
    assert_eq!(report.enqueued, 0);
    assert_eq!(service.calls().len(), 1);
    assert!(queue.published().is_empty());
}

#[tokio::test]
async fn test_publish_failure_skips_only_that_candidate() {
    let service =
        ScriptedService::new().with_categories(Reply::Ok(strings(&["Früchte", "Getränke"])));
    let (pipeline, _service, queue) = pipeline_for(service, Locale::De);
    queue.reject("FR2CHTE");

    let report = pipeline.run(Vec::new()).await.unwrap();

    assert_eq!(report.enqueued, 1);
    assert_eq!(report.skipped[0].candidate, "FR2CHTE");
    assert_eq!(report.skipped[0].stage, Stage::Publish);
    assert_eq!(queue.published()[0].super_solution, "GETR0NKE");
}
