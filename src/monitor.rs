//! Backlog Monitor
//!
//! Long-running control loop that keeps the queue above its watermark. Each
//! tick reads the queue depth and, when it is below the watermark, runs one
//! production cycle to completion before the next tick is scheduled. Ticks and
//! cycles never overlap.

use crate::config::MonitorConfig;
use crate::pipeline::{ConceptPipeline, CycleReport};
use crate::queue::QueueTransport;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// One-shot override candidates.
///
/// [`PendingOverrides::take`] hands out the list and leaves an empty one
/// behind in a single step, so the list can be consumed at most once.
#[derive(Debug, Default)]
pub struct PendingOverrides {
    candidates: Mutex<Vec<String>>,
}

impl PendingOverrides {
    pub fn new(candidates: Vec<String>) -> Self {
        Self {
            candidates: Mutex::new(candidates),
        }
    }

    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.candidates.lock())
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.lock().is_empty()
    }
}

/// What a single tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The depth query failed.
    Unreachable { error: String },
    /// Depth at or above the watermark; nothing was generated.
    Saturated { depth: u64 },
    /// A cycle ran to completion.
    Filled { depth: u64, report: CycleReport },
    /// The cycle could not obtain candidates.
    Aborted { depth: u64, error: String },
}

impl TickOutcome {
    /// Pause before the next tick.
    pub fn next_delay(&self, config: &MonitorConfig) -> Duration {
        match self {
            TickOutcome::Unreachable { .. } | TickOutcome::Aborted { .. } => config.error_backoff(),
            TickOutcome::Saturated { .. } | TickOutcome::Filled { .. } => config.check_interval(),
        }
    }
}

/// Watermark-driven refill loop.
pub struct BacklogMonitor {
    queue: Arc<dyn QueueTransport>,
    pipeline: ConceptPipeline,
    overrides: PendingOverrides,
    config: MonitorConfig,
}

impl BacklogMonitor {
    pub fn new(
        queue: Arc<dyn QueueTransport>,
        pipeline: ConceptPipeline,
        overrides: Vec<String>,
        config: MonitorConfig,
    ) -> Self {
        Self {
            queue,
            pipeline,
            overrides: PendingOverrides::new(overrides),
            config,
        }
    }

    pub fn pending_overrides(&self) -> &PendingOverrides {
        &self.overrides
    }

    /// Run ticks until `shutdown` is cancelled.
    ///
    /// Cancellation is observed between ticks and during the pause; a cycle
    /// in progress runs to completion first.
    pub async fn run(&self, shutdown: CancellationToken) {
        info!(
            threshold = self.config.threshold,
            check_interval_secs = self.config.check_interval_secs,
            "Started worker"
        );

        while !shutdown.is_cancelled() {
            let outcome = self.tick().await;
            let delay = outcome.next_delay(&self.config);

            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = sleep(delay) => {}
            }
        }

        info!("Worker stopped");
    }

    /// Check the queue once and refill it if needed.
    pub async fn tick(&self) -> TickOutcome {
        info!("Checking queue");
        let depth = match self.queue.length().await {
            Ok(depth) => depth,
            Err(err) => {
                error!(
                    error = %err,
                    backoff_secs = self.config.error_backoff_secs,
                    "Queue depth query failed"
                );
                return TickOutcome::Unreachable {
                    error: err.to_string(),
                };
            }
        };

        if depth >= self.config.threshold {
            info!(depth, "Queue is filled");
            return TickOutcome::Saturated { depth };
        }

        info!(depth, threshold = self.config.threshold, "Queue below watermark, filling");
        let overrides = self.overrides.take();

        match self.pipeline.run(overrides).await {
            Ok(report) => {
                if report.enqueued == 0 {
                    warn!(
                        candidates = report.candidates.len(),
                        "No concepts enqueued during this cycle"
                    );
                }
                TickOutcome::Filled { depth, report }
            }
            Err(err) => {
                error!(
                    error = %err,
                    backoff_secs = self.config.error_backoff_secs,
                    "Production cycle aborted"
                );
                TickOutcome::Aborted {
                    depth,
                    error: err.to_string(),
                }
            }
        }
    }
}
