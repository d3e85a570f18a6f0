//! Merge rules: defaults first, then the optional file, then the environment.

use config::builder::DefaultState;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with every optional setting defaulted.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("log_level", "info")?
        .set_default("log_format", "text")?
        .set_default("log_color", true)?
        .set_default("queue_key", "generate-riddle")?
        .set_default("queue_threshold", 15)?
        .set_default("queue_timeout_secs", 10)?
        .set_default("check_interval_secs", 5)?
        .set_default("error_backoff_secs", 30)?
        .set_default("openai_base_url", crate::provider::DEFAULT_OPENAI_BASE_URL)?
        .set_default("reasoning_model", "gpt-5")?
        .set_default("reasoning_effort", "high")?
        .set_default("chat_model", "gpt-5-chat-latest")?
        .set_default("request_timeout_secs", 300)
}
