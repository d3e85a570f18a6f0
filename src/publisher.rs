//! Job Publishing
//!
//! Wraps assembled concepts into the queue envelope understood by the
//! downstream riddle generator and pushes them onto the queue.

use crate::error::PublishError;
use crate::queue::QueueTransport;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Job type understood by the consumer as "build a riddle from this concept".
pub const NEW_JOB_TYPE: &str = "new";

/// Complete generation output for one puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concept {
    /// Encoded super-solution.
    pub super_solution: String,
    /// Cryptic clue, free text.
    pub theme_description: String,
    /// Encoded, unique terms in first-seen order.
    pub word_pool: Vec<String>,
}

/// Queue envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    #[serde(rename = "type")]
    pub job_type: String,
    /// JSON-encoded [`Concept`].
    pub payload: String,
}

impl Job {
    pub fn new_concept(concept: &Concept) -> Result<Self, serde_json::Error> {
        Ok(Self {
            job_type: NEW_JOB_TYPE.to_string(),
            payload: serde_json::to_string(concept)?,
        })
    }

    /// Decode the wrapped concept.
    pub fn concept(&self) -> Result<Concept, serde_json::Error> {
        serde_json::from_str(&self.payload)
    }
}

/// Serializes concepts and pushes them onto the queue.
///
/// Failures are returned unretried; the pipeline skips the candidate.
#[derive(Clone)]
pub struct JobPublisher {
    queue: Arc<dyn QueueTransport>,
}

impl JobPublisher {
    pub fn new(queue: Arc<dyn QueueTransport>) -> Self {
        Self { queue }
    }

    pub async fn enqueue(&self, concept: &Concept) -> Result<(), PublishError> {
        let job = Job::new_concept(concept)?;
        let data = serde_json::to_vec(&job)?;
        self.queue.push_left(data).await?;
        Ok(())
    }
}
