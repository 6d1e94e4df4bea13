use indoc::indoc;
use tracing::{debug, info, warn};

use crate::errors::{AgentError, AgentResult};
use crate::history::FixedFirstChatHistory;
use crate::models::message::Message;
use crate::providers::base::Provider;

/// Marker the critic emits once it has nothing left to improve
pub const STOP_MARKER: &str = "<OK>";

/// Iteration budget used when the caller has no preference
pub const DEFAULT_STEPS: usize = 10;

// System prompt + latest user turn + latest assistant turn
const HISTORY_CAPACITY: usize = 3;

const BASE_GENERATION_SYSTEM_PROMPT: &str = indoc! {"
    Your task is to Generate the best content possible for the user's request.
    If the user provides critique, respond with a revised version of your previous attempt.
    You must always output the revised content.
"};

const BASE_REFLECTION_SYSTEM_PROMPT: &str = indoc! {"
    You are tasked with generating critique and recommendations to the user's generated content.
    If the user content has something wrong or something to be improved, output a list of recommendations
    and critiques. If the user content is ok and there's nothing to change, output this: <OK>
"};

fn compose_prompt(custom: &str, base: &str) -> String {
    if custom.trim().is_empty() {
        base.to_string()
    } else {
        format!("{}\n{}", custom.trim_end(), base)
    }
}

/// Alternates a generator and a critic until the critic is satisfied
///
/// Generator and critic share the provider but keep separate histories, each
/// framed by its own system prompt.
pub struct ReflectionAgent {
    provider: Box<dyn Provider>,
}

impl ReflectionAgent {
    pub fn new(provider: Box<dyn Provider>) -> Self {
        Self { provider }
    }

    fn request_completion(&self, history: &[Message], stage: &str) -> AgentResult<String> {
        let (message, usage) = self.provider.complete(history)?;
        debug!(
            stage,
            model = self.provider.model(),
            total_tokens = ?usage.total_tokens,
            output = message.content(),
            "completion received"
        );
        Ok(message.content().to_string())
    }

    /// Produce the next draft from the generator's history
    pub fn generate(&self, generation_history: &FixedFirstChatHistory) -> AgentResult<String> {
        self.request_completion(generation_history.as_slice(), "generation")
    }

    /// Critique the latest draft from the critic's history
    pub fn reflect(&self, reflection_history: &FixedFirstChatHistory) -> AgentResult<String> {
        self.request_completion(reflection_history.as_slice(), "reflection")
    }

    /// Run up to `n_steps` generate/critique rounds and return the latest draft.
    ///
    /// The custom prompts are extended with the base generation and reflection
    /// instructions. The loop stops early when the critique contains
    /// [`STOP_MARKER`]. Any provider failure aborts the run.
    pub fn run(
        &self,
        user_msg: &str,
        generation_system_prompt: &str,
        reflection_system_prompt: &str,
        n_steps: usize,
    ) -> AgentResult<String> {
        if n_steps == 0 {
            return Err(AgentError::InvalidConfig(
                "reflection needs at least one step".to_string(),
            ));
        }

        let mut generation_history = FixedFirstChatHistory::new(
            vec![
                Message::system(compose_prompt(
                    generation_system_prompt,
                    BASE_GENERATION_SYSTEM_PROMPT,
                )),
                Message::user(user_msg),
            ],
            Some(HISTORY_CAPACITY),
        )?;

        let mut reflection_history = FixedFirstChatHistory::new(
            vec![Message::system(compose_prompt(
                reflection_system_prompt,
                BASE_REFLECTION_SYSTEM_PROMPT,
            ))],
            Some(HISTORY_CAPACITY),
        )?;

        let mut draft = String::new();
        for step in 1..=n_steps {
            info!(step, total = n_steps, "reflection step");

            draft = self.generate(&generation_history)?;
            generation_history.push(Message::assistant(draft.as_str()));
            reflection_history.push(Message::user(draft.as_str()));

            let critique = self.reflect(&reflection_history)?;
            if critique.contains(STOP_MARKER) {
                info!(step, "stop sequence found, stopping the reflection loop");
                return Ok(draft);
            }

            generation_history.push(Message::user(critique.as_str()));
            reflection_history.push(Message::assistant(critique));
        }

        warn!(n_steps, "reflection budget exhausted without a stop sequence");
        Ok(draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::role::Role;
    use crate::providers::mock::MockProvider;
    use anyhow::Result;
    use std::sync::Arc;

    fn agent(provider: &Arc<MockProvider>) -> ReflectionAgent {
        ReflectionAgent::new(Box::new(Arc::clone(provider)))
    }

    fn contents(messages: &[Message]) -> Vec<&str> {
        messages.iter().map(Message::content).collect()
    }

    #[test]
    fn test_stops_after_first_approval() -> Result<()> {
        let provider = Arc::new(MockProvider::new(vec!["first draft", "Looks great. <OK>"]));

        let result = agent(&provider).run("Write a haiku", "You are a poet.", "You are a critic.", 5)?;

        assert_eq!(result, "first draft");
        let requests = provider.requests();
        assert_eq!(requests.len(), 2);

        let generation = &requests[0];
        assert_eq!(generation.len(), 2);
        assert_eq!(generation[0].role(), Role::System);
        assert!(generation[0].content().starts_with("You are a poet.\n"));
        assert!(generation[0].content().contains("Generate the best content possible"));
        assert_eq!(generation[1], Message::user("Write a haiku"));

        let reflection = &requests[1];
        assert!(reflection[0].content().starts_with("You are a critic.\n"));
        assert!(reflection[0].content().contains(STOP_MARKER));
        assert_eq!(reflection[1], Message::user("first draft"));
        Ok(())
    }

    #[test]
    fn test_runs_full_budget_without_approval() -> Result<()> {
        let provider = Arc::new(MockProvider::new(vec![
            "draft 1", "critique 1", "draft 2", "critique 2", "draft 3", "critique 3",
        ]));

        let result = agent(&provider).run("Write a haiku", "", "", 3)?;

        assert_eq!(result, "draft 3");
        let requests = provider.requests();
        assert_eq!(requests.len(), 6);

        // Generator sees its persona, the previous draft and the critique of it
        assert_eq!(requests[4].len(), 3);
        assert_eq!(requests[4][0].role(), Role::System);
        assert_eq!(contents(&requests[4][1..]), vec!["draft 2", "critique 2"]);
        assert_eq!(requests[4][1].role(), Role::Assistant);
        assert_eq!(requests[4][2].role(), Role::User);

        // Critic sees its persona, its last critique and the new draft
        assert_eq!(contents(&requests[3][1..]), vec!["critique 1", "draft 2"]);
        assert_eq!(requests[3][1].role(), Role::Assistant);
        assert_eq!(requests[3][2].role(), Role::User);
        Ok(())
    }

    #[test]
    fn test_empty_custom_prompts_use_base_prompts() -> Result<()> {
        let provider = Arc::new(MockProvider::new(vec!["draft", "<OK>"]));
        agent(&provider).run("Write", "", "", 1)?;

        let requests = provider.requests();
        assert_eq!(requests[0][0].content(), BASE_GENERATION_SYSTEM_PROMPT);
        assert_eq!(requests[1][0].content(), BASE_REFLECTION_SYSTEM_PROMPT);
        Ok(())
    }

    #[test]
    fn test_provider_failure_aborts() {
        let provider = Arc::new(MockProvider::scripted(vec![
            Ok("draft".to_string()),
            Err("upstream unavailable".to_string()),
        ]));

        let result = agent(&provider).run("Write", "", "", 3);

        assert!(matches!(result, Err(AgentError::Completion(_))));
        assert_eq!(provider.requests().len(), 2);
    }

    #[test]
    fn test_zero_steps_rejected() {
        let provider = Arc::new(MockProvider::new(Vec::<String>::new()));

        let result = agent(&provider).run("Write", "", "", 0);

        assert!(matches!(result, Err(AgentError::InvalidConfig(_))));
        assert!(provider.requests().is_empty());
    }
}
