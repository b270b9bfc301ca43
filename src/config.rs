//! Configuration types.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::error::ConfigError;

/// Prefix of the placeholder key shipped in sample environments.
pub const PLACEHOLDER_KEY_PREFIX: &str = "sk-placeholder";

/// Application configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `OPENAI_API_KEY`. `None` when unset, empty, or a placeholder.
    pub api_key: Option<SecretString>,
    /// Chat model name.
    pub model: String,
    /// Base URL of the OpenAI-compatible API.
    pub llm_base_url: String,
    /// Sampling temperature for every collaborator call.
    pub temperature: f32,
    /// HTTP timeout for a single collaborator call.
    pub llm_timeout: Duration,
    /// Port for the REST surface.
    pub port: u16,
    /// Base of the share link handed out for a session.
    pub share_base_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gpt-5".to_string(),
            llm_base_url: "https://api.openai.com/v1".to_string(),
            temperature: 0.7,
            llm_timeout: Duration::from_secs(120),
            port: 8080,
            share_base_url: "https://collabalign.app".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let api_key = lookup("OPENAI_API_KEY")
            .filter(|k| is_usable_key(k))
            .map(SecretString::from);

        let model = lookup("COLLABALIGN_MODEL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.model);

        let llm_base_url = lookup("COLLABALIGN_LLM_BASE_URL")
            .map(|s| s.trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.llm_base_url);

        let temperature = parse_or("COLLABALIGN_TEMPERATURE", &lookup, defaults.temperature);
        let timeout_secs = parse_or(
            "COLLABALIGN_LLM_TIMEOUT_SECS",
            &lookup,
            defaults.llm_timeout.as_secs(),
        );
        let port = parse_or("COLLABALIGN_PORT", &lookup, defaults.port);

        let share_base_url = lookup("COLLABALIGN_SHARE_BASE_URL")
            .map(|s| s.trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.share_base_url);

        Self {
            api_key,
            model,
            llm_base_url,
            temperature,
            llm_timeout: Duration::from_secs(timeout_secs),
            port,
            share_base_url,
        }
    }

    /// Reject values the collaborator or the share link cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::InvalidValue {
                key: "COLLABALIGN_TEMPERATURE".to_string(),
                message: format!("{} is outside 0.0..=2.0", self.temperature),
            });
        }
        if self.llm_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                key: "COLLABALIGN_LLM_TIMEOUT_SECS".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if !self.llm_base_url.starts_with("http://") && !self.llm_base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                key: "COLLABALIGN_LLM_BASE_URL".to_string(),
                message: format!(
                    "{} is not an absolute http(s) URL such as https://api.openai.com/v1",
                    self.llm_base_url
                ),
            });
        }
        Ok(())
    }

    /// Whether a real API key is available.
    pub fn credentials_configured(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| is_usable_key(k.expose_secret()))
    }
}

fn is_usable_key(key: &str) -> bool {
    let key = key.trim();
    !key.is_empty() && !key.starts_with(PLACEHOLDER_KEY_PREFIX)
}

fn parse_or<T: std::str::FromStr>(
    key: &str,
    lookup: &impl Fn(&str) -> Option<String>,
    default: T,
) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Ignoring unparseable config value");
            default
        }),
        None => default,
    }
}
