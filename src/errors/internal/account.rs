use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use super::InternalError;

pub const DUPLICATE_EMAIL: &str = "A user with this email already exists.";
pub const DUPLICATE_NATIONAL_ID: &str = "A user with this National ID already exists.";

/// Field-level validation failures, keyed by form field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Record the first failure of a check, if any
    pub fn check(&mut self, field: &str, result: Result<(), String>) {
        if let Err(message) = result {
            self.add(field, message);
        }
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &BTreeMap<String, Vec<String>> {
        &self.fields
    }

    /// `Ok(())` when nothing was recorded, otherwise the collected errors
    pub fn into_result(self) -> Result<(), AccountError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AccountError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Domain errors raised by account, session and authorization operations
#[derive(Error, Debug)]
pub enum AccountError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("User not found: {user_id}")]
    UserNotFound { user_id: i64 },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is inactive: {user_id}")]
    AccountInactive { user_id: i64 },

    #[error("User {user_id} attempted to deactivate their own account")]
    SelfDeactivation { user_id: i64 },

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Unknown group: {0}")]
    UnknownGroup(String),
}

impl AccountError {
    pub fn validation(field: &str, message: impl Into<String>) -> InternalError {
        InternalError::Account(Self::Validation(ValidationErrors::single(field, message)))
    }

    pub fn user_not_found(user_id: i64) -> InternalError {
        InternalError::Account(Self::UserNotFound { user_id })
    }

    pub fn invalid_credentials() -> InternalError {
        InternalError::Account(Self::InvalidCredentials)
    }

    pub fn account_inactive(user_id: i64) -> InternalError {
        InternalError::Account(Self::AccountInactive { user_id })
    }

    pub fn self_deactivation(user_id: i64) -> InternalError {
        InternalError::Account(Self::SelfDeactivation { user_id })
    }
}
