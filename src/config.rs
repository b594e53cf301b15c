//! Configuration management for the validation service
//!
//! Loads `config.toml` and layers `WELLNESS__*` environment variables on top.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::time::Duration;

use crate::validation::PasswordPolicy;

/// Complete service configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerSettings,
    pub password: PasswordPolicy,
    pub forms: FormPolicy,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            password: PasswordPolicy::strict(),
            forms: FormPolicy::default(),
        }
    }
}

/// Network and per-connection limits
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    /// IP address to bind the listener
    pub bind_address: String,

    /// Listening port; 0 picks an ephemeral port
    /// Environment: WELLNESS__SERVER__PORT
    pub port: u16,

    /// Maximum concurrent connections
    pub max_clients: usize,

    /// Longest accepted command line in bytes
    pub max_line_length: usize,

    /// Commands allowed per connection within one rate window
    pub max_requests: usize,
    pub rate_window_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 4747,
            max_clients: 32,
            max_line_length: 1024,
            max_requests: 60,
            rate_window_secs: 60,
        }
    }
}

/// Registration form limits
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct FormPolicy {
    pub min_age: u32,
    pub max_phone_digits: usize,

    /// Copied from the `[password]` table after loading
    #[serde(skip)]
    pub password: PasswordPolicy,
}

impl Default for FormPolicy {
    fn default() -> Self {
        Self {
            min_age: 18,
            max_phone_digits: 15,
            password: PasswordPolicy::strict(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from config.toml with environment overrides
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_paths = [
            "wellness-validator/config", // container layout: /app/wellness-validator/config.toml
            "config",                    // local development: ./config.toml
        ];

        let mut last_error = None;

        for config_path in config_paths {
            match Config::builder()
                .add_source(File::with_name(config_path))
                .add_source(Environment::with_prefix("WELLNESS").separator("__"))
                .build()
            {
                Ok(settings) => {
                    let config: ServiceConfig = settings.try_deserialize()?;
                    config.validate()?;
                    return Ok(config.with_shared_password_policy());
                }
                Err(e) => {
                    last_error = Some(e);
                }
            }
        }

        Err(config::ConfigError::Message(format!(
            "Failed to load config.toml from any location. Tried: {config_paths:?}. Last error: {last_error:?}"
        )))
    }

    /// The `[password]` table is authoritative for form checks too
    pub fn with_shared_password_policy(mut self) -> Self {
        self.forms.password = self.password.clone();
        self
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.server.bind_address.is_empty() {
            return Err(config::ConfigError::Message(
                "bind_address cannot be empty".into(),
            ));
        }

        if self.server.max_clients == 0 {
            return Err(config::ConfigError::Message(
                "max_clients must be greater than 0".into(),
            ));
        }

        if self.server.max_line_length == 0 {
            return Err(config::ConfigError::Message(
                "max_line_length must be greater than 0".into(),
            ));
        }

        if self.server.max_requests == 0 || self.server.rate_window_secs == 0 {
            return Err(config::ConfigError::Message(
                "max_requests and rate_window_secs must be greater than 0".into(),
            ));
        }

        if self.password.min_length == 0 || self.password.min_identity_fragment == 0 {
            return Err(config::ConfigError::Message(
                "password minimums must be at least 1".into(),
            ));
        }

        if self.forms.max_phone_digits == 0 {
            return Err(config::ConfigError::Message(
                "max_phone_digits must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}

impl ServerSettings {
    /// Bind address and port as a socket address string
    pub fn listen_socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Rate limiting window as Duration
    pub fn rate_window(&self) -> Duration {
        Duration::from_secs(self.rate_window_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(text: &str) -> Result<ServiceConfig, config::ConfigError> {
        let config: ServiceConfig = Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config.with_shared_password_policy())
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = ServiceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.listen_socket(), "127.0.0.1:4747");
        assert_eq!(config.forms.min_age, 18);
        assert_eq!(config.password.min_length, 8);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = from_toml("[server]\nport = 9000\n[password]\nmin_length = 10\n").unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.max_clients, 32);
        assert_eq!(config.password.min_length, 10);
        assert_eq!(config.forms.password.min_length, 10);
        assert_eq!(config.server.rate_window(), Duration::from_secs(60));
    }

    #[test]
    fn test_forms_password_table_is_ignored() {
        let config =
            from_toml("[password]\nmin_length = 12\n[forms.password]\nmin_length = 20\n").unwrap();
        assert_eq!(config.password.min_length, 12);
        assert_eq!(config.forms.password, config.password);
    }

    #[test]
    fn test_default_service_policy_is_strict() {
        let config = ServiceConfig::default();
        assert_eq!(config.password, PasswordPolicy::strict());
        assert_eq!(config.forms.password, PasswordPolicy::strict());
    }

    #[test]
    fn test_rejects_zero_limits() {
        assert!(from_toml("[server]\nmax_clients = 0\n").is_err());
        assert!(from_toml("[password]\nmin_length = 0\n").is_err());
        assert!(from_toml("[forms]\nmax_phone_digits = 0\n").is_err());
    }
}
