//! Queue Transport
//!
//! The downstream work queue is a named Redis list. The worker only reads its
//! length and pushes onto its head; the consumer pops from the other end.

use crate::config::QueueConfig;
use crate::error::{ConfigError, QueueError};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::future::Future;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// List-like queue operations consumed by the worker.
#[async_trait]
pub trait QueueTransport: Send + Sync {
    /// Current number of jobs waiting in the queue.
    async fn length(&self) -> Result<u64, QueueError>;

    /// Push one serialized job onto the head of the queue.
    async fn push_left(&self, job: Vec<u8>) -> Result<(), QueueError>;
}

/// Redis list transport.
///
/// Connects lazily so an unreachable server at startup is a transport error
/// (retried by the monitor), not a configuration error.
pub struct RedisQueue {
    client: redis::Client,
    key: String,
    timeout: Duration,
    connection: Mutex<Option<ConnectionManager>>,
}

impl RedisQueue {
    pub fn new(config: &QueueConfig) -> Result<Self, ConfigError> {
        let url = connection_url(&config.redis_url);
        let client = redis::Client::open(url.as_str()).map_err(|e| ConfigError::Invalid {
            key: "REDIS_URL",
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            key: config.key.clone(),
            timeout: config.timeout(),
            connection: Mutex::new(None),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    async fn connection(&self) -> Result<ConnectionManager, QueueError> {
        let mut guard = self.connection.lock().await;
        if let Some(connection) = guard.as_ref() {
            return Ok(connection.clone());
        }

        let connection = self
            .bounded(ConnectionManager::new(self.client.clone()))
            .await?;
        info!(queue = %self.key, "Connected to queue");
        *guard = Some(connection.clone());
        Ok(connection)
    }

    async fn bounded<T, F>(&self, operation: F) -> Result<T, QueueError>
    where
        F: Future<Output = redis::RedisResult<T>>,
    {
        match tokio::time::timeout(self.timeout, operation).await {
            Ok(result) => result.map_err(|source| QueueError::Transport {
                key: self.key.clone(),
                source,
            }),
            Err(_) => Err(QueueError::Timeout {
                key: self.key.clone(),
                timeout_secs: self.timeout.as_secs(),
            }),
        }
    }
}

#[async_trait]
impl QueueTransport for RedisQueue {
    async fn length(&self) -> Result<u64, QueueError> {
        let mut connection = self.connection().await?;
        let length: u64 = self.bounded(connection.llen(&self.key)).await?;
        debug!(queue = %self.key, length, "Queried queue length");
        Ok(length)
    }

    async fn push_left(&self, job: Vec<u8>) -> Result<(), QueueError> {
        let mut connection = self.connection().await?;
        let length: u64 = self.bounded(connection.lpush(&self.key, job)).await?;
        debug!(queue = %self.key, length, "Pushed job");
        Ok(())
    }
}

/// Accept both bare `host:port` addresses and full connection URLs.
pub fn connection_url(address: &str) -> String {
    let address = address.trim();
    if address.contains("://") {
        address.to_string()
    } else {
        format!("redis://{}", address)
    }
}
