//! Concept Generation Service
//!
//! The three generative capabilities the production cycle depends on. The
//! [`GenerativeService`] trait is the seam the pipeline is written against;
//! [`PromptGenerator`] implements it on top of chat-completion clients.

use crate::config::GeneratorConfig;
use crate::error::{GenerationError, ProviderError, Stage};
use crate::locale::Locale;
use crate::provider::{ChatMessage, CompletionOptions, ModelProviderClient, OpenAIClient};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

pub mod prompts;

/// Generative capabilities consumed by the concept pipeline.
///
/// List-returning operations report malformed responses as
/// [`GenerationError::Parse`]; the caller decides whether that is fatal.
#[async_trait]
pub trait GenerativeService: Send + Sync {
    /// Raw super-solution candidates.
    async fn generate_categories(&self, locale: Locale) -> Result<Vec<String>, GenerationError>;

    /// Short cryptic clue for a category (natural form).
    async fn generate_theme(&self, locale: Locale, category: &str)
        -> Result<String, GenerationError>;

    /// Raw terms belonging to a category (natural form).
    async fn generate_word_pool(
        &self,
        locale: Locale,
        category: &str,
    ) -> Result<Vec<String>, GenerationError>;
}

/// Prompt-driven generator.
///
/// Category and word-pool requests go to a reasoning model as a system prompt;
/// theme requests go to a fast chat model as a user prompt.
pub struct PromptGenerator {
    reasoning: Arc<dyn ModelProviderClient>,
    chat: Arc<dyn ModelProviderClient>,
    reasoning_effort: String,
}

impl PromptGenerator {
    pub fn new(
        reasoning: Arc<dyn ModelProviderClient>,
        chat: Arc<dyn ModelProviderClient>,
        reasoning_effort: impl Into<String>,
    ) -> Self {
        Self {
            reasoning,
            chat,
            reasoning_effort: reasoning_effort.into(),
        }
    }

    /// Build OpenAI-backed clients from configuration.
    pub fn from_config(config: &GeneratorConfig) -> Result<Self, ProviderError> {
        let reasoning = OpenAIClient::new(
            config.reasoning_model.clone(),
            config.api_key.clone(),
            Some(config.base_url.clone()),
            config.request_timeout(),
        )?;
        let chat = OpenAIClient::new(
            config.chat_model.clone(),
            config.api_key.clone(),
            Some(config.base_url.clone()),
            config.request_timeout(),
        )?;
        Ok(Self::new(
            Arc::new(reasoning),
            Arc::new(chat),
            config.reasoning_effort.clone(),
        ))
    }

    async fn reasoning_request(&self, stage: Stage, prompt: String) -> Result<String, GenerationError> {
        debug!(
            %stage,
            provider = %self.reasoning.provider_name(),
            model = %self.reasoning.model_name(),
            prompt = %prompt,
            "Sending reasoning request"
        );
        let response = self
            .reasoning
            .complete(
                vec![ChatMessage::system(prompt)],
                CompletionOptions::reasoning(self.reasoning_effort.clone()),
            )
            .await
            .map_err(|source| GenerationError::Request { stage, source })?;
        debug!(%stage, raw = %response.content, "Raw generation result");
        Ok(response.content)
    }

    async fn fast_request(&self, stage: Stage, prompt: String) -> Result<String, GenerationError> {
        debug!(
            %stage,
            provider = %self.chat.provider_name(),
            model = %self.chat.model_name(),
            prompt = %prompt,
            "Sending chat request"
        );
        let response = self
            .chat
            .complete(vec![ChatMessage::user(prompt)], CompletionOptions::default())
            .await
            .map_err(|source| GenerationError::Request { stage, source })?;
        debug!(%stage, raw = %response.content, "Raw generation result");
        Ok(response.content)
    }
}

#[async_trait]
impl GenerativeService for PromptGenerator {
    async fn generate_categories(&self, locale: Locale) -> Result<Vec<String>, GenerationError> {
        let raw = self
            .reasoning_request(Stage::Categories, prompts::categories(locale).to_string())
            .await?;
        parse_term_list(Stage::Categories, &raw)
    }

    async fn generate_theme(
        &self,
        locale: Locale,
        category: &str,
    ) -> Result<String, GenerationError> {
        let raw = self
            .fast_request(Stage::Theme, prompts::theme(locale, category))
            .await?;
        Ok(raw.trim().to_string())
    }

    async fn generate_word_pool(
        &self,
        locale: Locale,
        category: &str,
    ) -> Result<Vec<String>, GenerationError> {
        let raw = self
            .reasoning_request(Stage::WordPool, prompts::word_pool(locale, category))
            .await?;
        parse_term_list(Stage::WordPool, &raw)
    }
}

/// Parse a JSON string array out of a model response.
///
/// The response is uppercased first, with `ß` kept as `ẞ`. Text around the
/// outermost brackets (code fences, stray prose) is ignored.
pub fn parse_term_list(stage: Stage, raw: &str) -> Result<Vec<String>, GenerationError> {
    let upper = raw.replace('ß', "ẞ").to_uppercase();
    let (start, end) = match (upper.find('['), upper.rfind(']')) {
        (Some(start), Some(end)) if start < end => (start, end),
        _ => {
            return Err(GenerationError::Parse {
                stage,
                reason: "response contains no JSON array".to_string(),
            })
        }
    };

    serde_json::from_str::<Vec<String>>(&upper[start..=end]).map_err(|e| GenerationError::Parse {
        stage,
        reason: e.to_string(),
    })
}
