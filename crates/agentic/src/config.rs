use std::env;

use anyhow::{anyhow, Result};

/// Configuration that can be read from environment variables
pub trait FromEnv {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self>
    where
        Self: Sized;

    /// Helper function to get environment variables with error handling
    fn get_env(key: &str, required: bool, default: Option<String>) -> Result<Option<String>> {
        match env::var(key) {
            Ok(value) => Ok(Some(value)),
            Err(env::VarError::NotPresent) if !required => Ok(default),
            Err(env::VarError::NotPresent) => Err(anyhow!(
                "Environment variable '{}' is required but not set.",
                key
            )),
            Err(e) => Err(e.into()),
        }
    }

    /// Read an optional variable and parse it, falling back to `default`.
    fn get_env_parsed<T>(key: &str, default: T) -> Result<T>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match Self::get_env(key, false, None)? {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e| anyhow!("Environment variable '{}' is invalid: {}", key, e)),
            None => Ok(default),
        }
    }
}
