//! Concept Pipeline
//!
//! One production cycle: obtain super-solution candidates, then for each
//! candidate in order generate a theme and a word pool, normalize the results
//! and publish the assembled concept.
//!
//! Only a failed request for the candidate list aborts a cycle. Every other
//! failure is confined to the candidate it happened on.

use crate::error::{CycleError, GenerationError, Stage};
use crate::generation::GenerativeService;
use crate::locale::Locale;
use crate::normalize::{TermBounds, TermNormalizer};
use crate::publisher::{Concept, JobPublisher};
use std::sync::Arc;
use tracing::{error, info, warn};

/// How a failed stage affects the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the cycle; nothing is enqueued.
    AbortCycle,
    /// Abandon the current candidate and continue with the next.
    SkipCandidate,
    /// Continue as if the call returned an empty list.
    TreatAsEmpty,
}

impl FailurePolicy {
    /// The policy for a generation error raised at `error.stage()`.
    pub fn for_error(error: &GenerationError) -> Self {
        match (error.stage(), error) {
            (_, GenerationError::Parse { .. }) => FailurePolicy::TreatAsEmpty,
            (Stage::Categories, GenerationError::Request { .. }) => FailurePolicy::AbortCycle,
            (_, GenerationError::Request { .. }) => FailurePolicy::SkipCandidate,
        }
    }
}

/// Where a cycle's candidates came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateSource {
    Override,
    Generated,
}

/// A candidate abandoned during a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedCandidate {
    pub candidate: String,
    pub stage: Stage,
    pub reason: String,
}

/// Result of one production cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub source: CandidateSource,
    /// Candidates in processing order.
    pub candidates: Vec<String>,
    /// Concepts successfully published.
    pub enqueued: usize,
    pub skipped: Vec<SkippedCandidate>,
    /// Set when the candidate list could not be parsed.
    pub candidate_parse_error: Option<String>,
}

/// Drives the three-stage generation for a cycle.
pub struct ConceptPipeline {
    generator: Arc<dyn GenerativeService>,
    publisher: JobPublisher,
    normalizer: TermNormalizer,
}

impl ConceptPipeline {
    pub fn new(generator: Arc<dyn GenerativeService>, publisher: JobPublisher, locale: Locale) -> Self {
        Self {
            generator,
            publisher,
            normalizer: TermNormalizer::new(locale),
        }
    }

    pub fn locale(&self) -> Locale {
        self.normalizer.locale()
    }

    /// Run one cycle.
    ///
    /// Non-empty `overrides` replace category generation for this cycle.
    pub async fn run(&self, overrides: Vec<String>) -> Result<CycleReport, CycleError> {
        let mut report = self.acquire_candidates(overrides).await?;

        for candidate in report.candidates.clone() {
            match self.produce(&candidate).await {
                Ok(concept) => {
                    info!(
                        super_solution = %concept.super_solution,
                        words = concept.word_pool.len(),
                        "Concept enqueued"
                    );
                    report.enqueued += 1;
                }
                Err(skipped) => {
                    error!(
                        candidate = %skipped.candidate,
                        stage = %skipped.stage,
                        reason = %skipped.reason,
                        "Skipping candidate"
                    );
                    report.skipped.push(skipped);
                }
            }
        }

        info!(
            source = ?report.source,
            candidates = report.candidates.len(),
            enqueued = report.enqueued,
            skipped = report.skipped.len(),
            "Production cycle finished"
        );
        Ok(report)
    }

    async fn acquire_candidates(&self, overrides: Vec<String>) -> Result<CycleReport, CycleError> {
        let locale = self.locale();

        if !overrides.is_empty() {
            let candidates: Vec<String> = overrides
                .iter()
                .filter(|candidate| {
                    let has_digit = candidate.chars().any(|c| c.is_ascii_digit());
                    if has_digit {
                        warn!(
                            candidate = %candidate,
                            "Dropping predefined super solution containing digits"
                        );
                    }
                    !has_digit
                })
                .map(|candidate| self.normalizer.safe_encode(candidate))
                .collect();
            info!(candidates = ?candidates, "Using predefined super solutions");
            return Ok(CycleReport::new(CandidateSource::Override, candidates));
        }

        info!(%locale, "Generating super solutions");
        let (raw, candidate_parse_error) = match self.generator.generate_categories(locale).await {
            Ok(raw) => (raw, None),
            Err(err) => match FailurePolicy::for_error(&err) {
                FailurePolicy::AbortCycle => {
                    error!(error = %err, "Super solution generation failed");
                    return Err(CycleError::Candidates(err));
                }
                _ => {
                    warn!(error = %err, "Super solution response unusable, continuing without candidates");
                    (Vec::new(), Some(err.to_string()))
                }
            },
        };

        let candidates = self.normalizer.filter_terms(&raw, TermBounds::CATEGORY);
        info!(
            raw = raw.len(),
            accepted = candidates.len(),
            "Generated super solutions"
        );

        let mut report = CycleReport::new(CandidateSource::Generated, candidates);
        report.candidate_parse_error = candidate_parse_error;
        Ok(report)
    }

    /// Generate, assemble and publish the concept for one candidate.
    async fn produce(&self, candidate: &str) -> Result<Concept, SkippedCandidate> {
        let locale = self.locale();
        let natural = self.normalizer.safe_decode(candidate);
        let skip = |stage: Stage, reason: String| SkippedCandidate {
            candidate: candidate.to_string(),
            stage,
            reason,
        };

        info!(candidate = %natural, "Generating theme");
        let theme = self
            .generator
            .generate_theme(locale, &natural)
            .await
            .map_err(|err| skip(Stage::Theme, err.to_string()))?;

        info!(candidate = %natural, "Generating word pool");
        let raw_pool = match self.generator.generate_word_pool(locale, &natural).await {
            Ok(raw_pool) => raw_pool,
            Err(err) => match FailurePolicy::for_error(&err) {
                FailurePolicy::TreatAsEmpty => {
                    warn!(candidate = %natural, error = %err, "Word pool response unusable");
                    Vec::new()
                }
                _ => return Err(skip(Stage::WordPool, err.to_string())),
            },
        };

        let word_pool = self.normalizer.filter_terms(&raw_pool, TermBounds::WORD);
        if word_pool.is_empty() {
            return Err(skip(
                Stage::WordPool,
                format!("no usable terms among {} returned", raw_pool.len()),
            ));
        }

        let concept = Concept {
            super_solution: candidate.to_string(),
            theme_description: theme,
            word_pool,
        };

        self.publisher
            .enqueue(&concept)
            .await
            .map_err(|err| skip(Stage::Publish, err.to_string()))?;

        Ok(concept)
    }
}

impl CycleReport {
    fn new(source: CandidateSource, candidates: Vec<String>) -> Self {
        Self {
            source,
            candidates,
            enqueued: 0,
            skipped: Vec::new(),
            candidate_parse_error: None,
        }
    }
}
