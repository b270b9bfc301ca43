//! LLM integration for CollabAlign.
//!
//! The core only needs one capability from the collaborator: send an ordered
//! list of `{role, content}` messages, get text back. `LlmProvider` is that
//! seam; `OpenAiProvider` is the HTTP implementation and
//! `UnconfiguredProvider` stands in when no API key is set.

pub mod openai;
pub mod provider;

pub use openai::OpenAiProvider;
pub use provider::*;

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use crate::config::AppConfig;
use crate::error::LlmError;

/// Configuration for creating an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// `None` selects the unconfigured provider.
    pub api_key: Option<SecretString>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl From<&AppConfig> for LlmConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.llm_base_url.clone(),
            timeout: config.llm_timeout,
        }
    }
}

/// Create an LLM provider from configuration.
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    match &config.api_key {
        Some(key) => {
            let provider = OpenAiProvider::new(
                key.clone(),
                &config.model,
                &config.base_url,
                config.timeout,
            )?;
            tracing::info!(model = %config.model, base_url = %config.base_url, "Using OpenAI-compatible provider");
            Ok(Arc::new(provider))
        }
        None => {
            tracing::warn!(
                "OPENAI_API_KEY is not set. AI features will run in degraded mode; set OPENAI_API_KEY to enable them."
            );
            Ok(Arc::new(UnconfiguredProvider::new(&config.model)))
        }
    }
}
