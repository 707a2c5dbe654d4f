use std::fmt;

/// Failure to load or validate a startup setting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidSetting { setting_name: String, reason: String },
    ParseError { setting_name: String, error: String },
    MissingRequiredSetting { setting_name: String },
}

impl ConfigError {
    pub fn invalid(setting_name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidSetting {
            setting_name: setting_name.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSetting { setting_name, reason } => {
                write!(f, "Invalid setting '{}': {}", setting_name, reason)
            }
            Self::ParseError { setting_name, error } => {
                write!(f, "Failed to parse setting '{}': {}", setting_name, error)
            }
            Self::MissingRequiredSetting { setting_name } => {
                write!(f, "Required setting '{}' is missing", setting_name)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
