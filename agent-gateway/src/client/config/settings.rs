use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Seconds between two status requests for the same job
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,

    /// Status requests issued before giving up on a job
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,
}

fn default_server_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_poll_interval() -> u64 {
    5
}

fn default_max_poll_attempts() -> u32 {
    120
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            poll_interval_seconds: default_poll_interval(),
            max_poll_attempts: default_max_poll_attempts(),
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config_path = std::env::var("AGENT_GATEWAY_CLIENT_CONFIG")
            .unwrap_or_else(|_| "config.toml".to_string());

        let settings = Config::builder()
            .add_source(File::with_name(&config_path).required(false))
            .add_source(config::Environment::with_prefix("AGENT_GATEWAY_CLIENT").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.server_url.is_empty() {
            return Err("server_url is required".to_string());
        }
        if !self.server_url.starts_with("http") {
            return Err("server_url must be a valid HTTP(S) URL".to_string());
        }
        if self.max_poll_attempts == 0 {
            return Err("max_poll_attempts must be at least 1".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert_eq!(settings.poll_interval_seconds, 5);
        assert_eq!(settings.max_poll_attempts, 120);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut settings = Settings {
            server_url: "localhost:3000".to_string(),
            ..Settings::default()
        };
        assert!(settings.validate().is_err());

        settings.server_url = "http://localhost:3000".to_string();
        settings.max_poll_attempts = 0;
        assert!(settings.validate().is_err());
    }
}
