//! Configuration management for turnstile.

use serde::{Deserialize, Serialize};

/// Environment variable naming the remote counter service base URL.
pub const ENV_COUNTER_URL: &str = "TURNSTILE_COUNTER_URL";
/// Environment variable naming the remote counter service bearer token.
pub const ENV_COUNTER_TOKEN: &str = "TURNSTILE_COUNTER_TOKEN";

/// Main configuration for the turnstile rate limiter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TurnstileConfig {
    /// Remote counter service configuration.
    ///
    /// When absent, every limit check is counted in-process. This is not an
    /// error condition; it simply means no cross-instance coordination.
    #[serde(default)]
    pub remote: Option<RemoteCounterConfig>,
}

/// Configuration for the remote atomic counter service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteCounterConfig {
    /// Base URL of the counter service, e.g. `https://counter.example.com`
    pub base_url: String,

    /// Bearer token sent with every counter request
    pub token: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    2000
}

impl TurnstileConfig {
    /// Load configuration from a YAML file path.
    pub fn from_file(path: &str) -> crate::error::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: TurnstileConfig = serde_yaml::from_str(&contents)
            .map_err(|e| crate::error::TurnstileError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Build configuration from the process environment.
    ///
    /// The remote backend is considered configured only when both the URL and
    /// token variables are present and non-empty.
    pub fn from_env() -> Self {
        let base_url = std::env::var(ENV_COUNTER_URL).unwrap_or_default();
        let token = std::env::var(ENV_COUNTER_TOKEN).unwrap_or_default();

        let remote = if base_url.is_empty() || token.is_empty() {
            None
        } else {
            Some(RemoteCounterConfig {
                base_url,
                token,
                timeout_ms: default_timeout_ms(),
            })
        };

        Self { remote }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_no_remote() {
        let config = TurnstileConfig::default();
        assert!(config.remote.is_none());
    }

    #[test]
    fn test_parse_yaml_with_remote() {
        let yaml = r#"
remote:
  base_url: https://counter.example.com
  token: secret-token
"#;
        let config: TurnstileConfig = serde_yaml::from_str(yaml).unwrap();
        let remote = config.remote.unwrap();
        assert_eq!(remote.base_url, "https://counter.example.com");
        assert_eq!(remote.token, "secret-token");
        assert_eq!(remote.timeout_ms, 2000);
    }

    #[test]
    fn test_parse_yaml_with_explicit_timeout() {
        let yaml = r#"
remote:
  base_url: https://counter.example.com
  token: secret-token
  timeout_ms: 500
"#;
        let config: TurnstileConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.remote.unwrap().timeout_ms, 500);
    }

    #[test]
    fn test_parse_empty_yaml() {
        let config: TurnstileConfig = serde_yaml::from_str("{}").unwrap();
        assert!(config.remote.is_none());
    }
}
