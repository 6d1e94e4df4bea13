use std::collections::HashMap;
use std::fmt;

use indoc::indoc;
use serde_json::Value;
use tracing::{debug, info};

use crate::errors::{AgentError, AgentResult};
use crate::extraction::extract_tag_content;
use crate::history::ChatHistory;
use crate::models::message::Message;
use crate::providers::base::Provider;
use crate::tool::{Tool, ToolCall};

const TOOL_CALL_TAG: &str = "tool_call";

const TOOL_SYSTEM_PROMPT: &str = indoc! {r#"
    You are a function calling AI model. You are provided with function signatures within <tools></tools> XML tags.
    You may call one or more functions to assist with the user query. Don't make assumptions about what values to plug
    into functions. Pay special attention to the properties 'types'. You should use those types as in a JSON object.
    For each function call return a json object with function name and arguments within <tool_call></tool_call>
    XML tags as follows:

    <tool_call>
    {"name": <function-name>, "arguments": <args-dict>, "id": <monotonically-increasing-id>}
    </tool_call>

    Here are the available tools:

    <tools>
    {tools}
    </tools>
"#};

/// Tool results keyed by the id of the call that produced them, in call order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Observations(Vec<(i64, Value)>);

impl Observations {
    /// Record `value` for `id`. A repeated id keeps its position and takes the
    /// newer value.
    pub fn insert(&mut self, id: i64, value: Value) {
        match self.0.iter_mut().find(|(call_id, _)| *call_id == id) {
            Some((_, existing)) => *existing = value,
            None => self.0.push((id, value)),
        }
    }

    pub fn get(&self, id: i64) -> Option<&Value> {
        self.0
            .iter()
            .find(|(call_id, _)| *call_id == id)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Observations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries: Vec<String> = self
            .0
            .iter()
            .map(|(id, value)| format!("{id}: {value}"))
            .collect();
        write!(f, "{{{}}}", entries.join(", "))
    }
}

/// Lets the model call registered tools before answering
pub struct ToolAgent {
    provider: Box<dyn Provider>,
    tools: Vec<Box<dyn Tool>>,
    tools_by_name: HashMap<String, usize>,
}

impl ToolAgent {
    /// Register `tools`; names must be unique.
    pub fn new(provider: Box<dyn Provider>, tools: Vec<Box<dyn Tool>>) -> AgentResult<Self> {
        let mut tools_by_name = HashMap::new();
        for (index, tool) in tools.iter().enumerate() {
            if tools_by_name.insert(tool.name().to_string(), index).is_some() {
                return Err(AgentError::DuplicateTool(tool.name().to_string()));
            }
        }

        Ok(Self {
            provider,
            tools,
            tools_by_name,
        })
    }

    pub fn tools(&self) -> impl Iterator<Item = &dyn Tool> {
        self.tools.iter().map(|tool| tool.as_ref())
    }

    /// Concatenated JSON signatures of every registered tool
    pub fn tool_signatures(&self) -> String {
        self.tools
            .iter()
            .map(|tool| tool.schema().signature())
            .collect()
    }

    fn system_prompt(&self) -> String {
        TOOL_SYSTEM_PROMPT.replace("{tools}", &self.tool_signatures())
    }

    fn find_tool(&self, name: &str) -> AgentResult<&dyn Tool> {
        self.tools_by_name
            .get(name)
            .map(|&index| self.tools[index].as_ref())
            .ok_or_else(|| AgentError::ToolNotFound(name.to_string()))
    }

    /// Parse, validate and execute each `<tool_call>` body in order.
    ///
    /// The first failing call aborts the whole batch.
    pub fn process_tool_calls(&self, tool_calls: &[String]) -> AgentResult<Observations> {
        let mut observations = Observations::default();

        for span in tool_calls {
            let ToolCall {
                name,
                arguments,
                id,
            } = ToolCall::parse(span)?;
            let tool = self.find_tool(&name)?;

            info!(tool = %name, id, "using tool");
            let result = tool.run(&arguments)?;
            debug!(tool = %name, id, %result, "tool finished");

            observations.insert(id, result);
        }

        Ok(observations)
    }

    /// Answer `user_msg`, running any tools the model asks for first.
    ///
    /// A first response without tool calls is returned verbatim. Otherwise the
    /// tool results are sent back alongside the original request for a final
    /// answer.
    pub fn run(&self, user_msg: &str) -> AgentResult<String> {
        let user_prompt = Message::user(user_msg);

        let tool_chat_history = ChatHistory::unbounded(vec![
            Message::system(self.system_prompt()),
            user_prompt.clone(),
        ]);

        info!(model = self.provider.model(), "sending query to the model");
        let (response, _) = self.provider.complete(tool_chat_history.as_slice())?;

        let tool_calls = extract_tag_content(response.content(), TOOL_CALL_TAG);
        if !tool_calls.found {
            info!("model answered without tools");
            return Ok(response.content().to_string());
        }

        info!(count = tool_calls.content.len(), "model requested tool calls");
        let observations = self.process_tool_calls(&tool_calls.content)?;

        let mut agent_chat_history = ChatHistory::unbounded(vec![user_prompt]);
        agent_chat_history.push(Message::user(format!("Observation: {observations}")));

        info!("requesting final answer");
        let (answer, _) = self.provider.complete(agent_chat_history.as_slice())?;
        Ok(answer.content().to_string())
    }
}
