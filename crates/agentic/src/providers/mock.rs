use anyhow::{anyhow, Result};
use std::sync::Mutex;

use crate::models::message::Message;
use crate::providers::base::{Provider, Usage};

/// A mock provider that returns pre-configured responses for testing
pub struct MockProvider {
    responses: Mutex<Vec<Result<String, String>>>,
    requests: Mutex<Vec<Vec<Message>>>,
}

impl MockProvider {
    /// Create a new mock provider with a sequence of responses
    pub fn new<S: Into<String>>(responses: Vec<S>) -> Self {
        Self::scripted(responses.into_iter().map(|r| Ok(r.into())).collect())
    }

    /// Create a mock provider where `Err` entries fail the matching request
    pub fn scripted(responses: Vec<Result<String, String>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every conversation sent to the provider so far
    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().unwrap().clone()
    }
}

impl Provider for MockProvider {
    fn model(&self) -> &str {
        "mock"
    }

    fn complete(&self, messages: &[Message]) -> Result<(Message, Usage)> {
        self.requests.lock().unwrap().push(messages.to_vec());

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(anyhow!("MockProvider has no responses left"));
        }
        match responses.remove(0) {
            Ok(text) => Ok((Message::assistant(text), Usage::default())),
            Err(e) => Err(anyhow!(e)),
        }
    }
}
