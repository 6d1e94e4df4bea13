use anyhow::{anyhow, Result};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde_json::{json, Map, Value};
use std::time::Duration;

use super::base::{Provider, Usage};
use super::configs::OpenAiProviderConfig;
use super::utils::{
    check_openai_context_length_error, get_usage, messages_to_openai_spec,
    openai_response_to_message,
};
use crate::models::message::Message;

/// Provider for any OpenAI-compatible chat-completion endpoint
pub struct OpenAiProvider {
    client: Client,
    config: OpenAiProviderConfig,
}

impl OpenAiProvider {
    pub fn new(config: OpenAiProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(600)) // 10 minutes timeout
            .build()?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.host.trim_end_matches('/'), path)
    }

    fn post(&self, payload: Value) -> Result<Value> {
        let response = self
            .client
            .post(self.url("v1/chat/completions"))
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()?;

        match response.status() {
            StatusCode::OK => Ok(response.json()?),
            status if status == StatusCode::TOO_MANY_REQUESTS || status.as_u16() >= 500 => {
                Err(anyhow!("Server error: {}", status))
            }
            status => {
                let body = response.text().unwrap_or_default();
                // Error payloads carry the details worth surfacing
                if let Ok(error) = serde_json::from_str::<Value>(&body) {
                    if let Some(err) = error.get("error").and_then(check_openai_context_length_error) {
                        return Err(err.into());
                    }
                }
                Err(anyhow!("Request failed: {}\nResponse: {}", status, body))
            }
        }
    }

    /// Identifiers of the models served at the configured host
    pub fn list_models(&self) -> Result<Vec<String>> {
        let response = self
            .client
            .get(self.url("v1/models"))
            .bearer_auth(&self.config.api_key)
            .send()?;

        if response.status() != StatusCode::OK {
            return Err(anyhow!("Request failed: {}", response.status()));
        }

        let body: Value = response.json()?;
        let models = body
            .get("data")
            .and_then(|data| data.as_array())
            .ok_or_else(|| anyhow!("No model list in response: {}", body))?
            .iter()
            .filter_map(|model| model.get("id").and_then(|id| id.as_str()))
            .map(str::to_string)
            .collect();

        Ok(models)
    }
}

impl Provider for OpenAiProvider {
    fn model(&self) -> &str {
        &self.config.model
    }

    fn complete(&self, messages: &[Message]) -> Result<(Message, Usage)> {
        let mut payload = Map::new();
        payload.insert("model".to_string(), json!(self.config.model));
        payload.insert(
            "messages".to_string(),
            Value::Array(messages_to_openai_spec(messages)),
        );

        // Add optional parameters
        if let Some(temp) = self.config.temperature {
            payload.insert("temperature".to_string(), json!(temp));
        }
        if let Some(tokens) = self.config.max_tokens {
            payload.insert("max_tokens".to_string(), json!(tokens));
        }

        // Make request
        let response = self.post(Value::Object(payload))?;

        // Raise specific error if context length is exceeded
        if let Some(error) = response.get("error") {
            if let Some(err) = check_openai_context_length_error(error) {
                return Err(err.into());
            }
            return Err(anyhow!("OpenAI API error: {}", error));
        }

        // Parse response
        let message = openai_response_to_message(&response)?;
        let usage = get_usage(&response);

        Ok((message, usage))
    }
}
