use std::time::Duration;

use crate::constants::DEFAULT_REQUEST_TIMEOUT_SECS;

/// Connection settings for the hosted rerank endpoint.
#[derive(Debug, Clone)]
pub struct RerankerConfig {
    pub api_key: String,

    pub base_url: String,

    pub timeout: Duration,
}

impl RerankerConfig {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.trim().is_empty() {
            return Err("api_key cannot be empty".to_string());
        }
        if self.base_url.trim().is_empty() {
            return Err("base_url cannot be empty".to_string());
        }
        if self.timeout.is_zero() {
            return Err("timeout must be positive".to_string());
        }
        Ok(())
    }
}
