//! Control loops that drive a [`Provider`](crate::providers::base::Provider)
//!
//! Each run builds its own histories and discards them when it returns, so an
//! agent can be reused for any number of sequential runs.
pub mod reflection;
pub mod tool_agent;
