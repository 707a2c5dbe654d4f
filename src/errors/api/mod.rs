// API-facing error types
pub mod accounts;
pub mod dashboard;

use poem_openapi::Object;

use crate::types::internal::Denial;

pub use accounts::AccountsError;
pub use dashboard::DashboardError;

/// Body of a 303 answer telling the client where to go instead
#[derive(Object, Debug)]
pub struct RedirectErrorResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable message, shown to the user as a notice
    pub message: String,

    /// HTTP status code
    pub status_code: u16,

    /// Path the client should navigate to
    pub redirect_to: String,
}

impl RedirectErrorResponse {
    pub(crate) fn for_denial(denial: Denial) -> Self {
        let (error, message) = match denial {
            Denial::Unauthenticated => ("login_required", "Please log in to continue."),
            Denial::InsufficientPermission => (
                "permission_denied",
                denial.notice().unwrap_or_default(),
            ),
        };
        Self {
            error: error.to_string(),
            message: message.to_string(),
            status_code: 303,
            redirect_to: denial.redirect_to().to_string(),
        }
    }
}
