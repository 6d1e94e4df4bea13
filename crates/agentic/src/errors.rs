use thiserror::Error;

use crate::tool::ParamType;

#[non_exhaustive]
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Completion request failed: {0}")]
    Completion(#[from] anyhow::Error),

    #[error("Malformed tool call: {0}")]
    MalformedToolCall(String),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Duplicate tool name: {0}")]
    DuplicateTool(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Cannot convert argument '{argument}' value {value} to {expected}")]
    Coercion {
        argument: String,
        expected: ParamType,
        value: String,
    },

    #[error("Tool execution failed: {0}")]
    ExecutionError(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type AgentResult<T> = Result<T, AgentError>;
