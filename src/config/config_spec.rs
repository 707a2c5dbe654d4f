use std::net::IpAddr;
use std::sync::Arc;

use crate::config::errors::ConfigError;
use crate::config::EnvironmentProvider;

/// Where a loaded value came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValueSource {
    EnvironmentVariable { name: String },
    Default,
}

#[derive(Debug, Clone)]
pub struct ConfigValue {
    pub value: String,
    pub source: ConfigValueSource,
}

/// Specification for one startup setting: environment variable, then default
pub struct ConfigSpec {
    env_provider: Arc<dyn EnvironmentProvider + Send + Sync>,
    env_override: Option<String>,
    default_value: Option<String>,
    min_length: Option<usize>,
    validator: Option<fn(&str) -> Result<(), String>>,
}

impl ConfigSpec {
    pub fn new(env_provider: Arc<dyn EnvironmentProvider + Send + Sync>) -> Self {
        Self {
            env_provider,
            env_override: None,
            default_value: None,
            min_length: None,
            validator: None,
        }
    }

    pub fn env_override(mut self, name: &str) -> Self {
        self.env_override = Some(name.to_string());
        self
    }

    pub fn default_value(mut self, value: &str) -> Self {
        self.default_value = Some(value.to_string());
        self
    }

    pub fn min_length(mut self, length: usize) -> Self {
        self.min_length = Some(length);
        self
    }

    pub fn validator(mut self, f: fn(&str) -> Result<(), String>) -> Self {
        self.validator = Some(f);
        self
    }

    fn setting_name(&self) -> &str {
        self.env_override.as_deref().unwrap_or("<unnamed>")
    }

    /// Load the value with environment override → default priority
    pub fn load(&self) -> Result<ConfigValue, ConfigError> {
        if let Some(name) = &self.env_override {
            if let Some(value) = self.env_provider.get_var(name) {
                self.validate_value(&value)?;
                return Ok(ConfigValue {
                    value,
                    source: ConfigValueSource::EnvironmentVariable { name: name.clone() },
                });
            }
        }

        match &self.default_value {
            Some(value) => {
                self.validate_value(value)?;
                Ok(ConfigValue {
                    value: value.clone(),
                    source: ConfigValueSource::Default,
                })
            }
            None => Err(ConfigError::MissingRequiredSetting {
                setting_name: self.setting_name().to_string(),
            }),
        }
    }

    fn validate_value(&self, value: &str) -> Result<(), ConfigError> {
        if let Some(min_len) = self.min_length {
            if value.len() < min_len {
                return Err(ConfigError::invalid(
                    self.setting_name(),
                    format!("Value must be at least {} characters long", min_len),
                ));
            }
        }

        if let Some(validator) = self.validator {
            validator(value).map_err(|reason| ConfigError::invalid(self.setting_name(), reason))?;
        }

        Ok(())
    }
}

// Parsing helpers shared by the settings structs
impl ConfigSpec {
    pub fn parse_port(value: &str, setting_name: &str) -> Result<u16, ConfigError> {
        let port = value.trim().parse::<u16>().map_err(|e| ConfigError::ParseError {
            setting_name: setting_name.to_string(),
            error: format!("Expected port number (1-65535), got '{}': {}", value, e),
        })?;

        if port == 0 {
            return Err(ConfigError::invalid(
                setting_name,
                "Port number must be between 1 and 65535",
            ));
        }

        Ok(port)
    }

    /// Parse a strictly positive integer
    pub fn parse_positive(value: &str, setting_name: &str) -> Result<i64, ConfigError> {
        let parsed = value.trim().parse::<i64>().map_err(|e| ConfigError::ParseError {
            setting_name: setting_name.to_string(),
            error: format!("Expected integer, got '{}': {}", value, e),
        })?;

        if parsed <= 0 {
            return Err(ConfigError::invalid(
                setting_name,
                format!("Value must be greater than zero, got {}", parsed),
            ));
        }

        Ok(parsed)
    }

    pub fn validate_ip_address(value: &str) -> Result<(), String> {
        value
            .trim()
            .parse::<IpAddr>()
            .map(|_| ())
            .map_err(|_| format!("'{}' is not a valid IP address", value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;

    fn env(vars: &[(&str, &str)]) -> Arc<dyn EnvironmentProvider + Send + Sync> {
        Arc::new(MockEnvironment::empty().with_vars(vars))
    }

    #[test]
    fn test_env_value_wins_over_default() {
        let value = ConfigSpec::new(env(&[("PORT", "8080")]))
            .env_override("PORT")
            .default_value("3000")
            .load()
            .unwrap();

        assert_eq!(value.value, "8080");
        assert_eq!(value.source, ConfigValueSource::EnvironmentVariable { name: "PORT".to_string() });
    }

    #[test]
    fn test_default_used_when_env_missing() {
        let value = ConfigSpec::new(env(&[]))
            .env_override("PORT")
            .default_value("3000")
            .load()
            .unwrap();

        assert_eq!(value.value, "3000");
        assert_eq!(value.source, ConfigValueSource::Default);
    }

    #[test]
    fn test_missing_without_default_is_an_error() {
        let result = ConfigSpec::new(env(&[])).env_override("DATABASE_URL").load();
        assert_eq!(
            result.unwrap_err(),
            ConfigError::MissingRequiredSetting { setting_name: "DATABASE_URL".to_string() }
        );
    }

    #[test]
    fn test_validator_rejects_value() {
        let result = ConfigSpec::new(env(&[("HOST", "not-an-ip")]))
            .env_override("HOST")
            .validator(ConfigSpec::validate_ip_address)
            .load();

        match result {
            Err(ConfigError::InvalidSetting { setting_name, .. }) => assert_eq!(setting_name, "HOST"),
            other => panic!("Expected InvalidSetting, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_port_bounds() {
        assert_eq!(ConfigSpec::parse_port("3000", "PORT").unwrap(), 3000);
        assert!(ConfigSpec::parse_port("0", "PORT").is_err());
        assert!(ConfigSpec::parse_port("70000", "PORT").is_err());
    }

    #[test]
    fn test_parse_positive() {
        assert_eq!(ConfigSpec::parse_positive("14", "REMEMBER_ME_TTL_DAYS").unwrap(), 14);
        assert!(ConfigSpec::parse_positive("0", "REMEMBER_ME_TTL_DAYS").is_err());
        assert!(ConfigSpec::parse_positive("-5", "REMEMBER_ME_TTL_DAYS").is_err());
        assert!(ConfigSpec::parse_positive("soon", "REMEMBER_ME_TTL_DAYS").is_err());
    }
}
