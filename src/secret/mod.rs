//! Secret word provider
//!
//! Produces the secret word and category for a round. A configured
//! generative text service is asked first; when there is none, or the single
//! attempt fails in any way, a word is drawn from the bundled fallback pool.
//! Failures never leave this module.

mod fallback;
mod ollama;
mod openai;

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::types::{Language, SecretData};

pub use fallback::{fallback_pool, pick_fallback};
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

/// Only this many recent words are listed in a generation prompt
pub const PROMPT_AVOID_LIMIT: usize = 50;

/// Result type for secret generation
pub type SecretResult<T> = Result<T, SecretError>;

/// Errors that can occur while asking a generator for a secret
#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Response parsing failed: {0}")]
    ParseError(String),

    #[error("Generator returned an empty word or category")]
    EmptyPayload,
}

/// Request sent to a generator
#[derive(Debug, Clone)]
pub struct SecretRequest {
    /// Full natural-language prompt
    pub prompt: String,
    /// Maximum response length in tokens (provider-dependent)
    pub max_tokens: Option<u32>,
    /// Timeout for the request
    pub timeout: Duration,
}

/// Raw response from a generator, before parsing
#[derive(Debug, Clone)]
pub struct GenerateResponse {
    /// JSON text expected to hold `{word, category}`
    pub text: String,
    pub metadata: ResponseMetadata,
}

#[derive(Debug, Clone)]
pub struct ResponseMetadata {
    /// Name of the provider (e.g., "openai", "ollama")
    pub provider: String,
    /// Model name used
    pub model: String,
    /// Latency in milliseconds
    pub latency_ms: u64,
}

/// Trait that all generative secret sources implement
#[async_trait]
pub trait SecretGenerator: Send + Sync {
    /// Run one generation attempt for the given prompt
    async fn generate(&self, request: SecretRequest) -> SecretResult<GenerateResponse>;

    /// Get the name of this provider
    fn name(&self) -> &str;
}

/// JSON schema for the structured `{word, category}` object
pub fn secret_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "word": { "type": "string", "description": "The secret word" },
            "category": { "type": "string", "description": "The category" }
        },
        "required": ["word", "category"],
        "additionalProperties": false
    })
}

/// Build the generation prompt for a round
pub fn build_prompt(topic: &str, recent_words: &[String], language: Language) -> String {
    let avoid_list = recent_words
        .iter()
        .take(PROMPT_AVOID_LIMIT)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let avoid_clause = if avoid_list.is_empty() {
        String::new()
    } else {
        format!("DO NOT use these words: {}.", avoid_list)
    };
    let lang = language.prompt_instruction();

    let topic = topic.trim();
    if topic.is_empty() {
        format!(
            "Pick a random, common, easy-to-guess object, place, person, animal or concept \
             for a social deduction party game where one player does not know the word. \
             It must be an everyday thing casual players know. Skip obscure words and \
             overused picks. {} Vary the category (household items, nature, transport, food, \
             places). {} Also give a broad category. Respond with a JSON object \
             containing \"word\" and \"category\".",
            avoid_clause, lang
        )
    } else {
        format!(
            "Pick a common, easy-to-guess object, place or person related to the topic \
             \"{}\" for a social deduction party game where one player does not know the word. \
             {} {} The word should be widely known. Also give a category for it. \
             Respond with a JSON object containing \"word\" and \"category\".",
            topic, avoid_clause, lang
        )
    }
}

#[derive(Debug, Deserialize)]
struct SecretPayload {
    word: String,
    category: String,
}

/// Parse a generator response into a secret, rejecting blank fields
pub fn parse_secret(text: &str) -> SecretResult<SecretData> {
    let trimmed = text.trim();
    // Some local models wrap JSON in a markdown fence even when asked not to
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    if body.is_empty() {
        return Err(SecretError::EmptyPayload);
    }

    let payload: SecretPayload =
        serde_json::from_str(body).map_err(|e| SecretError::ParseError(e.to_string()))?;

    let word = payload.word.trim();
    let category = payload.category.trim();
    if word.is_empty() || category.is_empty() {
        return Err(SecretError::EmptyPayload);
    }

    Ok(SecretData::new(word, category))
}

/// How a secret was obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretOutcome {
    /// Produced by the remote generator
    Generated(SecretData),
    /// Drawn from the bundled pool
    Fallback(SecretData),
}

impl SecretOutcome {
    pub fn into_secret(self) -> SecretData {
        match self {
            SecretOutcome::Generated(secret) | SecretOutcome::Fallback(secret) => secret,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, SecretOutcome::Fallback(_))
    }
}

/// Entry point used by the game controller
pub struct SecretProvider {
    generator: Option<Box<dyn SecretGenerator>>,
    timeout: Duration,
    max_tokens: u32,
}

impl SecretProvider {
    pub fn new(
        generator: Option<Box<dyn SecretGenerator>>,
        timeout: Duration,
        max_tokens: u32,
    ) -> Self {
        Self {
            generator,
            timeout,
            max_tokens,
        }
    }

    /// Provider that never calls out and always uses the fallback pool
    pub fn fallback_only() -> Self {
        let config = SecretConfig::default();
        Self::new(None, config.timeout, config.max_tokens)
    }

    pub fn from_config(config: &SecretConfig) -> Self {
        Self::new(config.build_generator(), config.timeout, config.max_tokens)
    }

    pub fn generator_name(&self) -> Option<&str> {
        self.generator.as_deref().map(|g| g.name())
    }

    /// Produce a secret, reporting whether the generator or the pool supplied it
    pub async fn generate(
        &self,
        topic: &str,
        recent_words: &[String],
        language: Language,
    ) -> SecretOutcome {
        let Some(generator) = self.generator.as_deref() else {
            tracing::debug!("No secret generator configured, using fallback pool");
            return SecretOutcome::Fallback(self.fallback(recent_words, language));
        };

        let request = SecretRequest {
            prompt: build_prompt(topic, recent_words, language),
            max_tokens: Some(self.max_tokens),
            timeout: self.timeout,
        };

        let result = generator
            .generate(request)
            .await
            .and_then(|response| {
                tracing::info!(
                    "Secret generated by {} ({}) in {}ms",
                    response.metadata.provider,
                    response.metadata.model,
                    response.metadata.latency_ms
                );
                parse_secret(&response.text)
            });

        match result {
            Ok(secret) => SecretOutcome::Generated(secret),
            Err(e) => {
                tracing::warn!(
                    "Secret generator {} failed: {}, using fallback pool",
                    generator.name(),
                    e
                );
                SecretOutcome::Fallback(self.fallback(recent_words, language))
            }
        }
    }

    /// Produce a secret for the round. Never fails.
    pub async fn provide(
        &self,
        topic: &str,
        recent_words: &[String],
        language: Language,
    ) -> SecretData {
        self.generate(topic, recent_words, language)
            .await
            .into_secret()
    }

    fn fallback(&self, recent_words: &[String], language: Language) -> SecretData {
        pick_fallback(language, recent_words, &mut rand::rng())
    }
}

/// Configuration for secret generation
#[derive(Debug, Clone)]
pub struct SecretConfig {
    /// OpenAI API key; its presence selects the OpenAI generator
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    /// Ollama base URL; used only when no OpenAI key is set
    pub ollama_base_url: Option<String>,
    pub ollama_model: String,
    /// Upper bound for the single generation attempt
    pub timeout: Duration,
    pub max_tokens: u32,
}

impl Default for SecretConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_model: "gpt-4o-mini".to_string(),
            ollama_base_url: None,
            ollama_model: "llama3.2".to_string(),
            timeout: Duration::from_secs(15),
            max_tokens: 100,
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

impl SecretConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            openai_api_key: non_empty_env("OPENAI_API_KEY"),
            openai_model: non_empty_env("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            ollama_base_url: non_empty_env("OLLAMA_BASE_URL"),
            ollama_model: non_empty_env("OLLAMA_MODEL").unwrap_or(defaults.ollama_model),
            timeout: non_empty_env("SECRET_TIMEOUT")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            max_tokens: non_empty_env("SECRET_MAX_TOKENS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_tokens),
        }
    }

    /// Build the generator this configuration asks for, if any
    pub fn build_generator(&self) -> Option<Box<dyn SecretGenerator>> {
        if let Some(api_key) = &self.openai_api_key {
            return Some(Box::new(OpenAiProvider::new(
                api_key.clone(),
                self.openai_model.clone(),
            )));
        }

        if let Some(base_url) = &self.ollama_base_url {
            return Some(Box::new(OllamaProvider::new(
                base_url.clone(),
                self.ollama_model.clone(),
            )));
        }

        None
    }
}
