use std::env;

pub const DEFAULT_BASE_URL: &str = "https://beatsaver.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Runtime configuration for the catalog client.
/// Values are sourced from environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Host root; the API lives under `<base_url>/api/`.
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: default_user_agent(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load configuration from environment.
    ///
    /// Env vars:
    /// - BEATSAVER_URL (default: https://beatsaver.com)
    /// - BEATSAVER_USER_AGENT (default: beatsaver-rs/<version>)
    /// - BEATSAVER_HTTP_TIMEOUT_SECS (default: 30)
    pub fn from_env() -> Self {
        let base_url = env::var("BEATSAVER_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let user_agent = env::var("BEATSAVER_USER_AGENT").unwrap_or_else(|_| default_user_agent());
        let timeout_secs = env::var("BEATSAVER_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            base_url,
            user_agent,
            timeout_secs,
        }
    }

    /// Point the client at another host (mock servers, mirrors).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

fn default_user_agent() -> String {
    format!("beatsaver-rs/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.base_url, "https://beatsaver.com");
        assert_eq!(cfg.timeout_secs, 30);
        assert!(cfg.user_agent.starts_with("beatsaver-rs/"));
    }

    #[test]
    fn base_url_override() {
        let cfg = Config::default().with_base_url("http://127.0.0.1:9000");
        assert_eq!(cfg.base_url, "http://127.0.0.1:9000");
    }
}
