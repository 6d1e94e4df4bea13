use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::models::message::Message;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: Option<i32>,
    pub output_tokens: Option<i32>,
    pub total_tokens: Option<i32>,
}

impl Usage {
    pub fn new(
        input_tokens: Option<i32>,
        output_tokens: Option<i32>,
        total_tokens: Option<i32>,
    ) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens,
        }
    }
}

/// Base trait for chat-completion providers (OpenAI, Groq, etc)
///
/// Calls block until the service answers; any transport or API failure is
/// returned as is, without retries.
pub trait Provider: Send + Sync {
    /// The model identifier sent with every request
    fn model(&self) -> &str;

    /// Generate the next assistant message for the given conversation
    fn complete(&self, messages: &[Message]) -> Result<(Message, Usage)>;
}

impl<P: Provider + ?Sized> Provider for Arc<P> {
    fn model(&self) -> &str {
        (**self).model()
    }

    fn complete(&self, messages: &[Message]) -> Result<(Message, Usage)> {
        (**self).complete(messages)
    }
}
