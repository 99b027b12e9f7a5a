use std::time::Duration;

use crate::url::DEFAULT_REFRESH_PATH;

/// Transport configuration for console API requests.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Base URL for all API endpoints.
    pub base_url: String,
    /// Path of the token refresh endpoint, relative to `base_url`.
    pub refresh_path: String,
    /// Optional `User-Agent` override.
    pub user_agent: Option<String>,
    /// Optional request timeout.
    pub timeout: Option<Duration>,
}

impl TransportConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            refresh_path: DEFAULT_REFRESH_PATH.to_string(),
            user_agent: None,
            timeout: None,
        }
    }

    pub fn with_refresh_path(mut self, refresh_path: impl Into<String>) -> Self {
        self.refresh_path = refresh_path.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
