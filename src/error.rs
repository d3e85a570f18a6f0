//! Error types for the concept worker.

use std::fmt;
use thiserror::Error;

/// Configuration errors. Always fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required configuration value: {0}")]
    Missing(&'static str),

    #[error("Invalid configuration value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("Configuration validation failed:\n{}", .0.join("\n"))]
    Validation(Vec<String>),

    #[error("Configuration source error: {0}")]
    Source(#[from] config::ConfigError),
}

/// Queue transport errors. Never fatal; the monitor backs off and retries.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Queue '{key}' unreachable: {source}")]
    Transport {
        key: String,
        #[source]
        source: redis::RedisError,
    },

    #[error("Queue '{key}' did not answer within {timeout_secs}s")]
    Timeout { key: String, timeout_secs: u64 },

    #[error("Queue '{key}' rejected the request: {reason}")]
    Rejected { key: String, reason: String },
}

/// Errors raised by the chat-completion client.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("Provider request failed: {0}")]
    RequestFailed(String),

    #[error("Provider request timed out: {0}")]
    Timeout(String),

    #[error("Provider authentication failed: {0}")]
    AuthFailed(String),

    #[error("Provider rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Provider model not found: {0}")]
    ModelNotFound(String),

    #[error("Provider returned a malformed response: {0}")]
    MalformedResponse(String),

    #[error("Provider client could not be built: {0}")]
    Client(String),
}

impl ProviderError {
    /// Whether repeating the same request can reasonably succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProviderError::RequestFailed(_) | ProviderError::Timeout(_) | ProviderError::RateLimit(_)
        )
    }
}

/// The generation stage a failure or a parse problem belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Categories,
    Theme,
    WordPool,
    Publish,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Categories => "categories",
            Stage::Theme => "theme",
            Stage::WordPool => "word-pool",
            Stage::Publish => "publish",
        };
        f.write_str(name)
    }
}

/// Errors raised by a generative service call.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Network, timeout or provider-side failure.
    #[error("{stage} request failed: {source}")]
    Request {
        stage: Stage,
        #[source]
        source: ProviderError,
    },

    /// The response was not well-formed structured data.
    #[error("{stage} response could not be parsed: {reason}")]
    Parse { stage: Stage, reason: String },
}

impl GenerationError {
    pub fn stage(&self) -> Stage {
        match self {
            GenerationError::Request { stage, .. } | GenerationError::Parse { stage, .. } => *stage,
        }
    }
}

/// Errors raised while publishing one concept.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Failed to serialize job: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to push job: {0}")]
    Queue(#[from] QueueError),
}

/// The only condition that aborts a production cycle.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("Could not obtain candidates: {0}")]
    Candidates(#[source] GenerationError),
}
