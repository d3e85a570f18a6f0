//! Configuration System
//!
//! Worker settings are layered with the `config` crate: built-in defaults, an
//! optional configuration file, a `.env` file, then environment variables. Required values
//! (queue address, language, generative-service credential) have no default;
//! a missing or invalid value is a fatal [`ConfigError`] at startup.

use crate::error::ConfigError;
use crate::locale::Locale;
use crate::logging::LoggingConfig;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

mod merge;
mod sources;

/// Flat settings as they appear in the environment and configuration files.
#[derive(Debug, Clone, Deserialize)]
struct RawSettings {
    redis_url: Option<String>,
    language: Option<String>,
    openai_api_key: Option<String>,
    predefined_super_solutions: Option<String>,
    log_level: String,
    log_format: String,
    log_color: bool,
    queue_key: String,
    queue_threshold: u64,
    queue_timeout_secs: u64,
    check_interval_secs: u64,
    error_backoff_secs: u64,
    openai_base_url: String,
    reasoning_model: String,
    reasoning_effort: String,
    chat_model: String,
    request_timeout_secs: u64,
}

/// Queue connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueConfig {
    /// `host:port` or `redis://` URL
    pub redis_url: String,
    /// Name of the Redis list jobs are pushed to
    pub key: String,
    /// Ceiling for a single queue command
    pub timeout_secs: u64,
}

impl QueueConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            redis_url: "localhost:6379".to_string(),
            key: "generate-riddle".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Backlog monitor settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Queue depth below which a production cycle runs
    pub threshold: u64,
    pub check_interval_secs: u64,
    /// Pause after a transport error or an aborted cycle
    pub error_backoff_secs: u64,
}

impl MonitorConfig {
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }

    pub fn error_backoff(&self) -> Duration {
        Duration::from_secs(self.error_backoff_secs)
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            threshold: 15,
            check_interval_secs: 5,
            error_backoff_secs: 30,
        }
    }
}

/// Generative service settings
#[derive(Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub api_key: String,
    pub base_url: String,
    /// Model for category and word-pool generation
    pub reasoning_model: String,
    pub reasoning_effort: String,
    /// Model for theme generation
    pub chat_model: String,
    pub request_timeout_secs: u64,
}

impl GeneratorConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl std::fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("reasoning_model", &self.reasoning_model)
            .field("reasoning_effort", &self.reasoning_effort)
            .field("chat_model", &self.chat_model)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// Root configuration structure
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub locale: Locale,
    pub queue: QueueConfig,
    pub monitor: MonitorConfig,
    pub generator: GeneratorConfig,
    pub logging: LoggingConfig,
    /// One-shot override candidates, consumed by the first cycle
    pub predefined_super_solutions: Vec<String>,
}

impl WorkerConfig {
    fn from_raw(raw: RawSettings) -> Result<Self, ConfigError> {
        let mut problems = Vec::new();

        let redis_url = required(raw.redis_url, "REDIS_URL", &mut problems);
        let api_key = required(raw.openai_api_key, "OPENAI_API_KEY", &mut problems);
        let locale = required(raw.language, "LANGUAGE", &mut problems).and_then(|language| {
            language
                .parse::<Locale>()
                .map_err(|e| problems.push(e.to_string()))
                .ok()
        });

        if raw.queue_threshold == 0 {
            problems.push("QUEUE_THRESHOLD must be at least 1".to_string());
        }
        for (key, value) in [
            ("CHECK_INTERVAL_SECS", raw.check_interval_secs),
            ("ERROR_BACKOFF_SECS", raw.error_backoff_secs),
            ("QUEUE_TIMEOUT_SECS", raw.queue_timeout_secs),
            ("REQUEST_TIMEOUT_SECS", raw.request_timeout_secs),
        ] {
            if value == 0 {
                problems.push(format!("{} must be greater than zero", key));
            }
        }
        if raw.queue_key.trim().is_empty() {
            problems.push("QUEUE_KEY cannot be empty".to_string());
        }

        let logging = LoggingConfig {
            level: raw.log_level.trim().to_lowercase(),
            format: raw.log_format.trim().to_lowercase(),
            color: raw.log_color,
        };
        if let Err(e) = logging.validate() {
            problems.push(e.to_string());
        }

        let (Some(redis_url), Some(api_key), Some(locale), true) =
            (redis_url, api_key, locale, problems.is_empty())
        else {
            return Err(ConfigError::Validation(problems));
        };

        Ok(Self {
            locale,
            queue: QueueConfig {
                redis_url,
                key: raw.queue_key.trim().to_string(),
                timeout_secs: raw.queue_timeout_secs,
            },
            monitor: MonitorConfig {
                threshold: raw.queue_threshold,
                check_interval_secs: raw.check_interval_secs,
                error_backoff_secs: raw.error_backoff_secs,
            },
            generator: GeneratorConfig {
                api_key,
                base_url: raw.openai_base_url,
                reasoning_model: raw.reasoning_model,
                reasoning_effort: raw.reasoning_effort,
                chat_model: raw.chat_model,
                request_timeout_secs: raw.request_timeout_secs,
            },
            logging,
            predefined_super_solutions: raw
                .predefined_super_solutions
                .as_deref()
                .map(parse_candidate_list)
                .unwrap_or_default(),
        })
    }
}

fn required(
    value: Option<String>,
    key: &'static str,
    problems: &mut Vec<String>,
) -> Option<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Some(v),
        _ => {
            problems.push(ConfigError::Missing(key).to_string());
            None
        }
    }
}

/// Split a comma-separated candidate list, trimming entries and dropping empty ones.
pub fn parse_candidate_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|candidate| !candidate.is_empty())
        .map(str::to_string)
        .collect()
}

/// Loads [`WorkerConfig`] from its layered sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from defaults, the optional file, `./.env` and the process environment.
    pub fn load(config_file: Option<&Path>) -> Result<WorkerConfig, ConfigError> {
        let dotenv = Path::new(sources::dotenv_file::DOTENV_FILE);
        Self::build(config_file, Some(dotenv), None)
    }

    /// Load with an explicit variable map standing in for the process environment.
    pub fn load_with_env(
        config_file: Option<&Path>,
        vars: HashMap<String, String>,
    ) -> Result<WorkerConfig, ConfigError> {
        Self::build(config_file, None, Some(vars))
    }

    /// Like [`ConfigLoader::load_with_env`], with a `.env` file layered under `vars`.
    pub fn load_with_dotenv(
        config_file: Option<&Path>,
        dotenv_file: &Path,
        vars: HashMap<String, String>,
    ) -> Result<WorkerConfig, ConfigError> {
        Self::build(config_file, Some(dotenv_file), Some(vars))
    }

    fn build(
        config_file: Option<&Path>,
        dotenv_file: Option<&Path>,
        vars: Option<HashMap<String, String>>,
    ) -> Result<WorkerConfig, ConfigError> {
        let builder = merge::merge_policy::builder_with_defaults()?;
        let builder = sources::config_file::add_to_builder(builder, config_file)?;
        let builder = sources::dotenv_file::add_to_builder(builder, dotenv_file)?;
        let builder = sources::environment::add_to_builder(builder, vars)?;
        let raw: RawSettings = builder.build()?.try_deserialize()?;
        WorkerConfig::from_raw(raw)
    }
}
