//! Text generation backend seam.

use crate::config::Config;
use async_trait::async_trait;
use claude::Claude;
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors from a text generation backend.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Claude API error: {0}")]
    Claude(#[from] claude::Error),

    #[error("Backend returned an empty completion")]
    EmptyOutput,

    #[error("Generation failed: {0}")]
    Other(String),
}

/// Something that turns a prompt into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for a single prompt.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Backend name for logs.
    fn name(&self) -> &str;
}

/// Production generator backed by the Claude Messages API.
#[derive(Debug, Clone)]
pub struct ClaudeGenerator {
    client: Claude,
    temperature: f32,
    max_tokens: usize,
}

impl ClaudeGenerator {
    /// Wrap an existing client.
    pub fn new(client: Claude, temperature: f32, max_tokens: usize) -> Self {
        Self {
            client,
            temperature,
            max_tokens,
        }
    }

    /// Build a client from the loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self, GenerationError> {
        let mut client = Claude::new(config.api_key.clone())?;
        if let Some(model) = &config.model {
            client = client.with_model(model.clone());
        }
        Ok(Self::new(client, config.temperature, config.max_tokens))
    }

    /// Sampling temperature sent with every request.
    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    /// The underlying client.
    pub fn client(&self) -> &Claude {
        &self.client
    }
}

#[async_trait]
impl TextGenerator for ClaudeGenerator {
    #[instrument(skip_all, fields(prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let text = self
            .client
            .complete_text(prompt, Some(self.temperature), self.max_tokens)
            .await?;
        debug!(model = self.client.model(), output_len = text.len(), "Completion received");
        Ok(text.trim().to_string())
    }

    fn name(&self) -> &str {
        "claude"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_applies_settings() {
        let mut config = Config::new("test-key");
        config.model = Some("claude-3-5-haiku-20241022".to_string());
        config.temperature = 0.4;

        let generator = ClaudeGenerator::from_config(&config).unwrap();
        assert_eq!(generator.client().model(), "claude-3-5-haiku-20241022");
        assert_eq!(generator.temperature(), 0.4);
        assert_eq!(generator.name(), "claude");
    }

    #[test]
    fn test_from_config_rejects_empty_key() {
        let config = Config::new("");
        let err = ClaudeGenerator::from_config(&config).unwrap_err();
        assert!(matches!(err, GenerationError::Claude(claude::Error::NoApiKey)));
    }
}
