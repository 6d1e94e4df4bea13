use anyhow::{anyhow, Result};

use crate::config::FromEnv;

pub const OPENAI_HOST: &str = "https://api.openai.com";
pub const OPENAI_MODEL: &str = "gpt-4o";
pub const GROQ_HOST: &str = "https://api.groq.com/openai";
pub const GROQ_MODEL: &str = "llama-3.3-70b-versatile";

// Unified enum to wrap different provider configurations
pub enum ProviderConfig {
    OpenAi(OpenAiProviderConfig),
    Groq(GroqProviderConfig),
}

impl ProviderConfig {
    pub fn model(&self) -> &str {
        match self {
            ProviderConfig::OpenAi(config) => &config.model,
            ProviderConfig::Groq(config) => &config.model,
        }
    }

    /// Replace the configured model
    pub fn with_model<S: Into<String>>(mut self, model: S) -> Self {
        match &mut self {
            ProviderConfig::OpenAi(config) => config.model = model.into(),
            ProviderConfig::Groq(config) => config.model = model.into(),
        }
        self
    }
}

#[derive(Debug, Clone)]
pub struct OpenAiProviderConfig {
    pub host: String,
    pub api_key: String,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<i32>,
}

impl FromEnv for OpenAiProviderConfig {
    fn from_env() -> Result<Self> {
        let api_key = Self::get_env("OPENAI_API_KEY", true, None)?
            .ok_or_else(|| anyhow!("OpenAI API key should be present"))?;

        let host = Self::get_env("OPENAI_HOST", false, Some(OPENAI_HOST.to_string()))?
            .unwrap_or_else(|| OPENAI_HOST.to_string());

        let model = Self::get_env("OPENAI_MODEL", false, Some(OPENAI_MODEL.to_string()))?
            .unwrap_or_else(|| OPENAI_MODEL.to_string());

        Ok(Self {
            host,
            api_key,
            model,
            temperature: None,
            max_tokens: None,
        })
    }
}

/// Groq serves an OpenAI-compatible API under its own host
#[derive(Debug, Clone)]
pub struct GroqProviderConfig {
    pub host: String,
    pub api_key: String,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<i32>,
}

impl FromEnv for GroqProviderConfig {
    fn from_env() -> Result<Self> {
        let api_key = Self::get_env("GROQ_API_KEY", true, None)?
            .ok_or_else(|| anyhow!("Groq API key should be present"))?;

        let host = Self::get_env("GROQ_HOST", false, Some(GROQ_HOST.to_string()))?
            .unwrap_or_else(|| GROQ_HOST.to_string());

        let model = Self::get_env("GROQ_MODEL", false, Some(GROQ_MODEL.to_string()))?
            .unwrap_or_else(|| GROQ_MODEL.to_string());

        Ok(Self {
            host,
            api_key,
            model,
            temperature: None,
            max_tokens: None,
        })
    }
}

impl From<GroqProviderConfig> for OpenAiProviderConfig {
    fn from(config: GroqProviderConfig) -> Self {
        Self {
            host: config.host,
            api_key: config.api_key,
            model: config.model,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}
