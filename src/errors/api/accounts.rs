use std::collections::BTreeMap;
use std::fmt;

use poem_openapi::{ApiResponse, Object, payload::Json};

use super::RedirectErrorResponse;
use crate::errors::internal::{AccountError, InternalError, ValidationErrors};
use crate::types::internal::Denial;
use crate::types::internal::role::DASHBOARD_PATH;

pub const INVALID_LOGIN_MESSAGE: &str =
    "Please enter a correct email and password. Note that both fields may be case-sensitive.";
pub const INACTIVE_ACCOUNT_MESSAGE: &str =
    "This account is inactive. Please contact the administrator.";
pub const SELF_DEACTIVATION_MESSAGE: &str = "You cannot deactivate your own account!";
pub const USER_NOT_FOUND_MESSAGE: &str = "User not found.";

/// Standardized error response for account endpoints
#[derive(Object, Debug)]
pub struct AccountsErrorResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,
}

/// Error response carrying per-field form errors
#[derive(Object, Debug)]
pub struct ValidationErrorResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,

    /// Messages keyed by the offending form field
    pub field_errors: BTreeMap<String, Vec<String>>,
}

/// Account endpoint error types
#[derive(ApiResponse, Debug)]
pub enum AccountsError {
    /// One or more submitted fields are invalid or already taken
    #[oai(status = 400)]
    ValidationFailed(Json<ValidationErrorResponse>),

    /// Email or password is wrong; never says which
    #[oai(status = 401)]
    InvalidCredentials(Json<AccountsErrorResponse>),

    /// Credentials are valid but the account is deactivated
    #[oai(status = 403)]
    AccountInactive(Json<AccountsErrorResponse>),

    /// Caller tried to deactivate their own account
    #[oai(status = 403)]
    SelfActionDenied(Json<AccountsErrorResponse>),

    /// Target user does not exist
    #[oai(status = 404)]
    UserNotFound(Json<AccountsErrorResponse>),

    /// No valid session; go to the login page
    #[oai(status = 303)]
    LoginRequired(
        Json<RedirectErrorResponse>,
        #[oai(header = "Location")] String,
    ),

    /// Session is valid but the role or group is not allowed
    #[oai(status = 303)]
    PermissionDenied(
        Json<RedirectErrorResponse>,
        #[oai(header = "Location")] String,
    ),

    /// Caller is already logged in; go to the dashboard
    #[oai(status = 303)]
    AlreadyAuthenticated(
        Json<RedirectErrorResponse>,
        #[oai(header = "Location")] String,
    ),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<AccountsErrorResponse>),
}

impl AccountsError {
    pub fn validation_failed(errors: &ValidationErrors) -> Self {
        AccountsError::ValidationFailed(Json(ValidationErrorResponse {
            error: "validation_failed".to_string(),
            message: "Please correct the errors below.".to_string(),
            status_code: 400,
            field_errors: errors.fields().clone(),
        }))
    }

    pub fn invalid_credentials() -> Self {
        AccountsError::InvalidCredentials(Json(AccountsErrorResponse {
            error: "invalid_credentials".to_string(),
            message: INVALID_LOGIN_MESSAGE.to_string(),
            status_code: 401,
        }))
    }

    pub fn account_inactive() -> Self {
        AccountsError::AccountInactive(Json(AccountsErrorResponse {
            error: "account_inactive".to_string(),
            message: INACTIVE_ACCOUNT_MESSAGE.to_string(),
            status_code: 403,
        }))
    }

    pub fn self_action_denied() -> Self {
        AccountsError::SelfActionDenied(Json(AccountsErrorResponse {
            error: "self_action_denied".to_string(),
            message: SELF_DEACTIVATION_MESSAGE.to_string(),
            status_code: 403,
        }))
    }

    pub fn user_not_found() -> Self {
        AccountsError::UserNotFound(Json(AccountsErrorResponse {
            error: "user_not_found".to_string(),
            message: USER_NOT_FOUND_MESSAGE.to_string(),
            status_code: 404,
        }))
    }

    pub fn already_authenticated() -> Self {
        AccountsError::AlreadyAuthenticated(
            Json(RedirectErrorResponse {
                error: "already_authenticated".to_string(),
                message: "You are already logged in.".to_string(),
                status_code: 303,
                redirect_to: DASHBOARD_PATH.to_string(),
            }),
            DASHBOARD_PATH.to_string(),
        )
    }

    pub fn from_denial(denial: Denial) -> Self {
        let location = denial.redirect_to().to_string();
        let body = Json(RedirectErrorResponse::for_denial(denial));
        match denial {
            Denial::Unauthenticated => AccountsError::LoginRequired(body, location),
            Denial::InsufficientPermission => AccountsError::PermissionDenied(body, location),
        }
    }

    /// Convert InternalError to AccountsError
    ///
    /// This is the explicit conversion point from internal errors to API errors.
    /// Infrastructure error details are logged but never exposed to clients.
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            InternalError::Database(_) => {
                tracing::error!("Database error in account operation: {}", err);
                Self::internal_server_error()
            }
            InternalError::Parse { value_type, .. } => {
                tracing::error!("Parse error for {}: {}", value_type, err);
                Self::internal_server_error()
            }
            InternalError::Crypto { operation, .. } => {
                tracing::error!("Crypto error in {}: {}", operation, err);
                Self::internal_server_error()
            }
            InternalError::Audit(_) => {
                tracing::error!("Activity log error surfaced to endpoint: {}", err);
                Self::internal_server_error()
            }

            InternalError::Account(AccountError::Validation(errors)) => {
                tracing::debug!("Validation failed: {}", errors);
                Self::validation_failed(errors)
            }
            InternalError::Account(AccountError::InvalidCredentials) => {
                tracing::debug!("Invalid credentials attempt");
                Self::invalid_credentials()
            }
            InternalError::Account(AccountError::AccountInactive { user_id }) => {
                tracing::info!("Login refused for inactive user {}", user_id);
                Self::account_inactive()
            }
            InternalError::Account(AccountError::SelfDeactivation { user_id }) => {
                tracing::warn!("User {} attempted to deactivate their own account", user_id);
                Self::self_action_denied()
            }
            InternalError::Account(AccountError::UserNotFound { user_id }) => {
                tracing::debug!("User not found: {}", user_id);
                Self::user_not_found()
            }
            InternalError::Account(AccountError::UnknownRole(role)) => {
                Self::validation_failed(&ValidationErrors::single(
                    "role",
                    format!("Select a valid choice. {} is not one of the available choices.", role),
                ))
            }
            InternalError::Account(AccountError::UnknownGroup(group)) => {
                Self::validation_failed(&ValidationErrors::single(
                    "group",
                    format!("Unknown group: {}", group),
                ))
            }
        }
    }

    /// Generic internal server error, never carries internal details
    fn internal_server_error() -> Self {
        AccountsError::InternalError(Json(AccountsErrorResponse {
            error: "internal_error".to_string(),
            message: "An internal error occurred".to_string(),
            status_code: 500,
        }))
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        match self {
            AccountsError::ValidationFailed(json) => json.0.message.clone(),
            AccountsError::InvalidCredentials(json) => json.0.message.clone(),
            AccountsError::AccountInactive(json) => json.0.message.clone(),
            AccountsError::SelfActionDenied(json) => json.0.message.clone(),
            AccountsError::UserNotFound(json) => json.0.message.clone(),
            AccountsError::LoginRequired(json, _) => json.0.message.clone(),
            AccountsError::PermissionDenied(json, _) => json.0.message.clone(),
            AccountsError::AlreadyAuthenticated(json, _) => json.0.message.clone(),
            AccountsError::InternalError(json) => json.0.message.clone(),
        }
    }

    /// Get the HTTP status code of the error variant
    pub fn status_code(&self) -> u16 {
        match self {
            AccountsError::ValidationFailed(json) => json.0.status_code,
            AccountsError::InvalidCredentials(json) => json.0.status_code,
            AccountsError::AccountInactive(json) => json.0.status_code,
            AccountsError::SelfActionDenied(json) => json.0.status_code,
            AccountsError::UserNotFound(json) => json.0.status_code,
            AccountsError::LoginRequired(json, _) => json.0.status_code,
            AccountsError::PermissionDenied(json, _) => json.0.status_code,
            AccountsError::AlreadyAuthenticated(json, _) => json.0.status_code,
            AccountsError::InternalError(json) => json.0.status_code,
        }
    }
}

impl fmt::Display for AccountsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::DbErr;

    #[test]
    fn test_validation_error_keeps_field_messages() {
        let err = AccountsError::from_internal_error(AccountError::validation(
            "email",
            crate::errors::internal::account::DUPLICATE_EMAIL,
        ));

        match err {
            AccountsError::ValidationFailed(json) => {
                assert_eq!(json.0.status_code, 400);
                assert_eq!(
                    json.0.field_errors.get("email"),
                    Some(&vec!["A user with this email already exists.".to_string()])
                );
            }
            other => panic!("Expected ValidationFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_credentials_message_is_generic() {
        let err = AccountsError::from_internal_error(AccountError::invalid_credentials());
        assert_eq!(err.status_code(), 401);
        assert_eq!(err.message(), INVALID_LOGIN_MESSAGE);
        assert!(!err.message().to_lowercase().contains("not found"));
    }

    #[test]
    fn test_inactive_account_is_distinct_from_invalid_credentials() {
        let err = AccountsError::from_internal_error(AccountError::account_inactive(3));
        match err {
            AccountsError::AccountInactive(json) => {
                assert_eq!(json.0.message, INACTIVE_ACCOUNT_MESSAGE);
            }
            other => panic!("Expected AccountInactive, got {:?}", other),
        }
    }

    #[test]
    fn test_self_deactivation_maps_to_self_action_denied() {
        let err = AccountsError::from_internal_error(AccountError::self_deactivation(1));
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.message(), SELF_DEACTIVATION_MESSAGE);
    }

    #[test]
    fn test_user_not_found() {
        let err = AccountsError::from_internal_error(AccountError::user_not_found(99));
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.message(), USER_NOT_FOUND_MESSAGE);
    }

    #[test]
    fn test_database_error_is_generic() {
        let err = AccountsError::from_internal_error(InternalError::database(
            "find_user",
            DbErr::Custom("disk on fire".to_string()),
        ));
        assert_eq!(err.status_code(), 500);
        assert!(!err.message().contains("disk on fire"));
    }

    #[test]
    fn test_denials_redirect_to_different_places() {
        match AccountsError::from_denial(Denial::Unauthenticated) {
            AccountsError::LoginRequired(body, location) => {
                assert_eq!(location, "/accounts/login");
                assert_eq!(body.0.redirect_to, "/accounts/login");
            }
            other => panic!("Expected LoginRequired, got {:?}", other),
        }

        match AccountsError::from_denial(Denial::InsufficientPermission) {
            AccountsError::PermissionDenied(body, location) => {
                assert_eq!(location, "/dashboard");
                assert_eq!(body.0.message, "You do not have permission to access this page.");
            }
            other => panic!("Expected PermissionDenied, got {:?}", other),
        }
    }
}
