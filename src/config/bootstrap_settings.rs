use std::fmt;
use std::sync::Arc;

use chrono::Duration;

use crate::config::config_spec::ConfigSpec;
use crate::config::errors::ConfigError;
use crate::config::EnvironmentProvider;

/// Infrastructure and session settings read once at startup
#[derive(Clone)]
pub struct BootstrapSettings {
    database_url: String,
    server_host: String,
    server_port: u16,
    session_ttl_minutes: i64,
    remember_me_ttl_days: i64,
}

impl BootstrapSettings {
    /// Load settings through the given environment provider
    pub fn from_env_provider(env_provider: Arc<dyn EnvironmentProvider + Send + Sync>) -> Result<Self, ConfigError> {
        let database_url = ConfigSpec::new(env_provider.clone())
            .env_override("DATABASE_URL")
            .default_value("sqlite://recruitment.db?mode=rwc")
            .min_length(1)
            .load()?
            .value;

        let server_host = ConfigSpec::new(env_provider.clone())
            .env_override("HOST")
            .default_value("0.0.0.0")
            .validator(ConfigSpec::validate_ip_address)
            .load()?
            .value;

        let port_value = ConfigSpec::new(env_provider.clone())
            .env_override("PORT")
            .default_value("3000")
            .load()?
            .value;
        let server_port = ConfigSpec::parse_port(&port_value, "PORT")?;

        let session_ttl_value = ConfigSpec::new(env_provider.clone())
            .env_override("SESSION_TTL_MINUTES")
            .default_value("120")
            .load()?
            .value;
        let session_ttl_minutes = ConfigSpec::parse_positive(&session_ttl_value, "SESSION_TTL_MINUTES")?;

        let remember_value = ConfigSpec::new(env_provider)
            .env_override("REMEMBER_ME_TTL_DAYS")
            .default_value("14")
            .load()?
            .value;
        let remember_me_ttl_days = ConfigSpec::parse_positive(&remember_value, "REMEMBER_ME_TTL_DAYS")?;

        Ok(Self {
            database_url,
            server_host,
            server_port,
            session_ttl_minutes,
            remember_me_ttl_days,
        })
    }

    /// Convenience method that uses the system environment provider
    pub fn from_env() -> Result<Self, ConfigError> {
        use crate::config::SystemEnvironment;
        Self::from_env_provider(Arc::new(SystemEnvironment))
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn server_host(&self) -> &str {
        &self.server_host
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::minutes(self.session_ttl_minutes)
    }

    pub fn remember_me_ttl(&self) -> Duration {
        Duration::days(self.remember_me_ttl_days)
    }

    pub fn session_lifetimes(&self) -> SessionLifetimes {
        SessionLifetimes {
            standard: self.session_ttl(),
            remember_me: self.remember_me_ttl(),
        }
    }
}

/// How long a session lives, with and without "remember me"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLifetimes {
    pub standard: Duration,
    pub remember_me: Duration,
}

impl SessionLifetimes {
    pub fn for_remember_me(&self, remember_me: bool) -> Duration {
        if remember_me { self.remember_me } else { self.standard }
    }
}

impl Default for SessionLifetimes {
    fn default() -> Self {
        Self {
            standard: Duration::minutes(120),
            remember_me: Duration::days(14),
        }
    }
}

impl fmt::Debug for BootstrapSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapSettings")
            .field("database_url", &self.database_url)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("session_ttl_minutes", &self.session_ttl_minutes)
            .field("remember_me_ttl_days", &self.remember_me_ttl_days)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;

    fn settings_from(vars: &[(&str, &str)]) -> Result<BootstrapSettings, ConfigError> {
        BootstrapSettings::from_env_provider(Arc::new(MockEnvironment::empty().with_vars(vars)))
    }

    #[test]
    fn test_bootstrap_settings_with_all_vars() {
        let settings = settings_from(&[
            ("DATABASE_URL", "sqlite://test.db"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("SESSION_TTL_MINUTES", "30"),
            ("REMEMBER_ME_TTL_DAYS", "7"),
        ])
        .unwrap();

        assert_eq!(settings.database_url(), "sqlite://test.db");
        assert_eq!(settings.server_address(), "127.0.0.1:8080");
        assert_eq!(settings.session_ttl(), Duration::minutes(30));
        assert_eq!(settings.remember_me_ttl(), Duration::days(7));
    }

    #[test]
    fn test_bootstrap_settings_with_defaults() {
        let settings = settings_from(&[]).unwrap();

        assert_eq!(settings.database_url(), "sqlite://recruitment.db?mode=rwc");
        assert_eq!(settings.server_host(), "0.0.0.0");
        assert_eq!(settings.server_port(), 3000);
        assert_eq!(settings.session_lifetimes(), SessionLifetimes::default());
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        match settings_from(&[("PORT", "not-a-port")]) {
            Err(ConfigError::ParseError { setting_name, .. }) => assert_eq!(setting_name, "PORT"),
            other => panic!("Expected ParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_session_ttl_is_rejected() {
        match settings_from(&[("SESSION_TTL_MINUTES", "0")]) {
            Err(ConfigError::InvalidSetting { setting_name, .. }) => {
                assert_eq!(setting_name, "SESSION_TTL_MINUTES")
            }
            other => panic!("Expected InvalidSetting, got {:?}", other),
        }
    }

    #[test]
    fn test_remember_me_extends_lifetime() {
        let lifetimes = SessionLifetimes::default();
        assert!(lifetimes.for_remember_me(true) > lifetimes.for_remember_me(false));
    }
}
