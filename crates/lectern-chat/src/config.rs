//! LLM configuration loading and provider selection.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::types::LLMProvider;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// LLM configuration read from `llm-config.json`, with env fallbacks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMConfig {
    /// `auto`, `gemini` or `openai`.
    #[serde(default = "default_preferred")]
    pub preferred_provider: String,
    #[serde(default)]
    pub gemini_api_key: Option<String>,
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    #[serde(default = "default_gemini_base_url")]
    pub gemini_base_url: String,
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,
}

fn default_preferred() -> String {
    "auto".into()
}
fn default_gemini_model() -> String {
    DEFAULT_GEMINI_MODEL.into()
}
fn default_openai_model() -> String {
    DEFAULT_OPENAI_MODEL.into()
}
fn default_gemini_base_url() -> String {
    DEFAULT_GEMINI_BASE_URL.into()
}
fn default_openai_base_url() -> String {
    DEFAULT_OPENAI_BASE_URL.into()
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            preferred_provider: default_preferred(),
            gemini_api_key: None,
            openai_api_key: None,
            gemini_model: default_gemini_model(),
            openai_model: default_openai_model(),
            gemini_base_url: default_gemini_base_url(),
            openai_base_url: default_openai_base_url(),
        }
    }
}

impl LLMConfig {
    /// Load config from file, falling back to env vars and defaults.
    pub fn load(config_path: &Path) -> Self {
        let mut config: LLMConfig = match std::fs::read_to_string(config_path) {
            Ok(s) => serde_json::from_str(&s).unwrap_or_else(|e| {
                warn!("Ignoring unreadable {}: {}", config_path.display(), e);
                LLMConfig::default()
            }),
            Err(_) => LLMConfig::default(),
        };

        if config.gemini_api_key.is_none() {
            config.gemini_api_key = non_empty_env("GEMINI_API_KEY");
        }
        if config.openai_api_key.is_none() {
            config.openai_api_key = non_empty_env("OPENAI_API_KEY");
        }
        if let Some(p) = non_empty_env("LECTERN_LLM_PROVIDER") {
            config.preferred_provider = p.to_lowercase();
        }

        match config.resolve_provider() {
            Some((provider, model, _)) => info!("LLM provider: {} ({})", provider, model),
            None => warn!("No LLM API key configured; /ask will fail until one is set"),
        }

        config
    }

    /// Resolve which provider, model and key to use.
    pub fn resolve_provider(&self) -> Option<(LLMProvider, String, String)> {
        let gemini = || {
            self.gemini_api_key
                .as_ref()
                .map(|k| (LLMProvider::Gemini, self.gemini_model.clone(), k.clone()))
        };
        let openai = || {
            self.openai_api_key
                .as_ref()
                .map(|k| (LLMProvider::OpenAI, self.openai_model.clone(), k.clone()))
        };

        match self.preferred_provider.as_str() {
            "gemini" => gemini(),
            "openai" => openai(),
            // Auto mode: Gemini > OpenAI
            "auto" => gemini().or_else(openai),
            _ => None,
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
