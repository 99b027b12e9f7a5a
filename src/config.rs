use std::path::{Path, PathBuf};
use std::time::Duration;

use auth_transport::{normalize_base_url, TransportConfig, DEFAULT_REFRESH_PATH};
use session_state::{profile_file_name, profile_root};

/// Configuration for the console client.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Base URL of the console API.
    pub base_url: String,
    /// Path of the token refresh endpoint, relative to `base_url`.
    pub refresh_path: String,
    /// Base URL for log channels; derived from `base_url` when absent.
    pub ws_base_url: Option<String>,
    /// Session profile location; omit for a purely in-memory session.
    pub profile_path: Option<PathBuf>,
    /// Optional `User-Agent` override.
    pub user_agent: Option<String>,
    /// Optional request timeout.
    pub timeout: Option<Duration>,
}

impl ConsoleConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            refresh_path: DEFAULT_REFRESH_PATH.to_string(),
            ws_base_url: None,
            profile_path: None,
            user_agent: None,
            timeout: None,
        }
    }

    pub fn with_refresh_path(mut self, refresh_path: impl Into<String>) -> Self {
        self.refresh_path = refresh_path.into();
        self
    }

    pub fn with_ws_base_url(mut self, ws_base_url: impl Into<String>) -> Self {
        self.ws_base_url = Some(ws_base_url.into());
        self
    }

    pub fn with_profile_path(mut self, profile_path: impl Into<PathBuf>) -> Self {
        self.profile_path = Some(profile_path.into());
        self
    }

    /// Places the session profile at the conventional location under `home`.
    pub fn with_profile_in(mut self, home: &Path) -> Self {
        self.profile_path = Some(profile_root(home).join(profile_file_name()));
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

    /// Base URL used for job log channels.
    #[must_use]
    pub fn channel_base(&self) -> String {
        match &self.ws_base_url {
            Some(explicit) => normalize_base_url(explicit),
            None => derive_ws_base(&self.base_url),
        }
    }

    pub(crate) fn transport_config(&self) -> TransportConfig {
        let mut config =
            TransportConfig::new(&self.base_url).with_refresh_path(&self.refresh_path);
        if let Some(user_agent) = &self.user_agent {
            config = config.with_user_agent(user_agent);
        }
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }
        config
    }
}

/// Map the API origin onto the channel origin: http(s) becomes ws(s) and the
/// channel endpoints live under the `/api` prefix.
fn derive_ws_base(base_url: &str) -> String {
    let base = normalize_base_url(base_url);
    let swapped = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        base
    };
    format!("{swapped}/api")
}

#[cfg(test)]
mod tests {
    use super::ConsoleConfig;

    #[test]
    fn channel_base_swaps_scheme_and_adds_api_prefix() {
        let config = ConsoleConfig::new("https://console.example.com/");
        assert_eq!(config.channel_base(), "wss://console.example.com/api");

        let config = ConsoleConfig::new("http://127.0.0.1:8080");
        assert_eq!(config.channel_base(), "ws://127.0.0.1:8080/api");
    }

    #[test]
    fn conventional_profile_location_sits_under_home() {
        let config =
            ConsoleConfig::new("https://console.example.com").with_profile_in(std::path::Path::new("/home/ops"));
        assert_eq!(
            config.profile_path.as_deref(),
            Some(std::path::Path::new("/home/ops/.console/session/profile.json"))
        );
    }

    #[test]
    fn explicit_ws_base_wins_over_derivation() {
        let config = ConsoleConfig::new("https://console.example.com")
            .with_ws_base_url("wss://stream.example.com/api/");
        assert_eq!(config.channel_base(), "wss://stream.example.com/api");
    }
}
