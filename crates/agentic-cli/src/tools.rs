//! Tools offered to the model by the `tool` command
use agentic::errors::AgentError;
use agentic::tool::Tool;
use chrono::Local;

fn overflow(operation: &str, a: i64, b: i64) -> AgentError {
    AgentError::ExecutionError(format!("{operation} of {a} and {b} overflows a 64-bit integer"))
}

pub fn builtin_tools() -> Vec<Box<dyn Tool>> {
    vec![
        Box::new(agentic::tool! {
            /// Add two integers and return the sum
            fn add(a: i64, b: i64) -> AgentResult<i64> {
                a.checked_add(b).ok_or_else(|| overflow("sum", a, b))
            }
        }),
        Box::new(agentic::tool! {
            /// Multiply two integers and return the product
            fn multiply(a: i64, b: i64) -> AgentResult<i64> {
                a.checked_mul(b).ok_or_else(|| overflow("product", a, b))
            }
        }),
        Box::new(agentic::tool! {
            /// Get the current local date and time
            fn get_current_time() -> String {
                Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
            }
        }),
        Box::new(agentic::tool! {
            /// Count the number of words in text
            fn count_words(text: String) -> usize {
                text.split_whitespace().count()
            }
        }),
    ]
}
