use super::{
    base::Provider,
    configs::{GroqProviderConfig, OpenAiProviderConfig, ProviderConfig},
    openai::OpenAiProvider,
};
use crate::config::FromEnv;
use anyhow::Result;
use strum_macros::{Display, EnumIter, EnumString};

#[derive(EnumIter, EnumString, Display, Debug, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "kebab-case")]
pub enum ProviderType {
    OpenAi,
    Groq,
}

/// Read the configuration of `provider_type` from the environment
pub fn load_config(provider_type: ProviderType) -> Result<ProviderConfig> {
    Ok(match provider_type {
        ProviderType::OpenAi => ProviderConfig::OpenAi(OpenAiProviderConfig::from_env()?),
        ProviderType::Groq => ProviderConfig::Groq(GroqProviderConfig::from_env()?),
    })
}

pub fn get_provider(config: ProviderConfig) -> Result<Box<dyn Provider>> {
    match config {
        ProviderConfig::OpenAi(openai_config) => Ok(Box::new(OpenAiProvider::new(openai_config)?)),
        ProviderConfig::Groq(groq_config) => Ok(Box::new(OpenAiProvider::new(groq_config.into())?)),
    }
}
