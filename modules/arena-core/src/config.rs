//! Configuration: secrets from the environment, tunables from an optional TOML file.

use std::path::Path;
use std::sync::Arc;

use ai_client::{Claude, GenerationRequest, OpenAi, TextGenerator};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CLAUDE_MODEL: &str = "claude-haiku-4-5-20251001";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Output budget and sampling temperature for one kind of generator call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerationSettings {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl GenerationSettings {
    pub const EVALUATION: Self = Self {
        max_tokens: 500,
        temperature: 0.3,
    };
    pub const JUDGE: Self = Self {
        max_tokens: 1000,
        temperature: 0.3,
    };
    pub const TOPIC: Self = Self {
        max_tokens: 100,
        temperature: 0.9,
    };

    pub fn apply(&self, request: GenerationRequest) -> GenerationRequest {
        request
            .max_tokens(self.max_tokens)
            .temperature(self.temperature)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Claude,
    OpenAi,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    #[serde(default)]
    pub kind: ProviderKind,
    /// Falls back to the provider's default model.
    pub model: Option<String>,
}

impl ProviderConfig {
    pub fn model(&self) -> &str {
        match (&self.model, self.kind) {
            (Some(model), _) => model,
            (None, ProviderKind::Claude) => DEFAULT_CLAUDE_MODEL,
            (None, ProviderKind::OpenAi) => DEFAULT_OPENAI_MODEL,
        }
    }
}

/// TOML-backed tunables. Every section is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArenaConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default = "default_evaluation")]
    pub evaluation: GenerationSettings,
    #[serde(default = "default_judge")]
    pub judge: GenerationSettings,
    #[serde(default = "default_topic")]
    pub topic: GenerationSettings,
}

fn default_evaluation() -> GenerationSettings {
    GenerationSettings::EVALUATION
}

fn default_judge() -> GenerationSettings {
    GenerationSettings::JUDGE
}

fn default_topic() -> GenerationSettings {
    GenerationSettings::TOPIC
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            evaluation: GenerationSettings::EVALUATION,
            judge: GenerationSettings::JUDGE,
            topic: GenerationSettings::TOPIC,
        }
    }
}

impl ArenaConfig {
    /// Build the configured provider, failing if its API key is not set.
    pub fn build_generator(&self, secrets: &Secrets) -> Result<Arc<dyn TextGenerator>> {
        let model = self.provider.model();
        let generator: Arc<dyn TextGenerator> = match self.provider.kind {
            ProviderKind::Claude => {
                let key = secrets
                    .anthropic_api_key
                    .as_deref()
                    .ok_or_else(|| anyhow!("ANTHROPIC_API_KEY is required for the claude provider"))?;
                Arc::new(Claude::new(key, model))
            }
            ProviderKind::OpenAi => {
                let key = secrets
                    .openai_api_key
                    .as_deref()
                    .ok_or_else(|| anyhow!("OPENAI_API_KEY is required for the openai provider"))?;
                Arc::new(OpenAi::new(key, model))
            }
        };
        tracing::info!(provider = ?self.provider.kind, model, "Text generator ready");
        Ok(generator)
    }
}

/// Load and parse a TOML config file.
pub fn load_config(path: &Path) -> Result<ArenaConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: ArenaConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    Ok(config)
}

/// API keys loaded from the environment.
#[derive(Debug, Clone, Default)]
pub struct Secrets {
    pub anthropic_api_key: Option<String>,
    pub openai_api_key: Option<String>,
}

impl Secrets {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self {
            anthropic_api_key: non_empty_env("ANTHROPIC_API_KEY"),
            openai_api_key: non_empty_env("OPENAI_API_KEY"),
        }
    }

    pub fn log_redacted(&self) {
        tracing::info!("Secrets loaded:");
        tracing::info!("  ANTHROPIC_API_KEY: {}", preview(&self.anthropic_api_key));
        tracing::info!("  OPENAI_API_KEY: {}", preview(&self.openai_api_key));
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn preview(val: &Option<String>) -> String {
    match val {
        Some(v) => {
            let head: String = v.chars().take(5).collect();
            format!("{head}...({} chars)", v.len())
        }
        None => "<not set>".to_string(),
    }
}
