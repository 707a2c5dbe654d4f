use std::fmt;

use crate::config::{EnvironmentProvider, SecretConfig, SecretType, SystemEnvironment};

/// Custom error type for secret-related failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretError {
    Missing { secret_name: String },
    InvalidLength { secret_name: String, expected: usize, actual: usize },
}

impl SecretError {
    pub fn missing(secret_name: &str) -> Self {
        Self::Missing {
            secret_name: secret_name.to_string(),
        }
    }

    pub fn invalid_length(secret_name: &str, expected: usize, actual: usize) -> Self {
        Self::InvalidLength {
            secret_name: secret_name.to_string(),
            expected,
            actual,
        }
    }
}

impl fmt::Display for SecretError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { secret_name } => {
                write!(f, "Required secret '{}' is missing", secret_name)
            }
            Self::InvalidLength { secret_name, expected, actual } => {
                write!(
                    f,
                    "Secret '{}' must be at least {} characters, got {}",
                    secret_name, expected, actual
                )
            }
        }
    }
}

impl std::error::Error for SecretError {}

/// Centralized manager for application secrets
pub struct SecretManager {
    password_pepper: String,
    session_secret: String,
}

impl SecretManager {
    /// Load and validate all secrets from the process environment
    ///
    /// # Errors
    /// Returns `SecretError` if any required secret is missing or too short
    pub fn init() -> Result<Self, SecretError> {
        Self::init_with_provider(&SystemEnvironment)
    }

    pub fn init_with_provider(env: &dyn EnvironmentProvider) -> Result<Self, SecretError> {
        let password_pepper = Self::load_secret(env, &Self::password_pepper_config())?;
        let session_secret = Self::load_secret(env, &Self::session_secret_config())?;

        Ok(Self {
            password_pepper,
            session_secret,
        })
    }

    /// Argon2id secret parameter mixed into every password hash
    fn password_pepper_config() -> SecretConfig {
        SecretConfig::env_var("PASSWORD_PEPPER")
            .required(true)
            .min_length(16)
    }

    /// HMAC key for hashing session tokens at rest
    fn session_secret_config() -> SecretConfig {
        SecretConfig::env_var("SESSION_SECRET")
            .required(true)
            .min_length(32)
    }

    pub fn password_pepper(&self) -> &str {
        &self.password_pepper
    }

    pub fn session_secret(&self) -> &str {
        &self.session_secret
    }

    pub(crate) fn load_secret(env: &dyn EnvironmentProvider, config: &SecretConfig) -> Result<String, SecretError> {
        let value = match &config.secret_type {
            SecretType::EnvVar { name } => match env.get_var(name) {
                Some(v) => v,
                None if !config.required => return Ok(String::new()),
                None => return Err(SecretError::missing(name)),
            },
        };

        if let Some(min_len) = config.min_length {
            if value.len() < min_len {
                return Err(SecretError::invalid_length(
                    config.secret_type.name(),
                    min_len,
                    value.len(),
                ));
            }
        }

        Ok(value)
    }
}

impl fmt::Debug for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretManager")
            .field("password_pepper", &"<redacted>")
            .field("session_secret", &"<redacted>")
            .finish()
    }
}

impl fmt::Display for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretManager {{ secrets_loaded: 2 }}")
    }
}
