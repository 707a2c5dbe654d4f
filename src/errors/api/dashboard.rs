use std::fmt;

use poem_openapi::{ApiResponse, Object, payload::Json};

use super::RedirectErrorResponse;
use crate::errors::internal::InternalError;
use crate::types::internal::Denial;

/// Error body for dashboard and activity endpoints
#[derive(Object, Debug)]
pub struct DashboardErrorResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,
}

#[derive(ApiResponse, Debug)]
pub enum DashboardError {
    /// No valid session; go to the login page
    #[oai(status = 303)]
    LoginRequired(
        Json<RedirectErrorResponse>,
        #[oai(header = "Location")] String,
    ),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<DashboardErrorResponse>),
}

impl DashboardError {
    pub fn login_required() -> Self {
        let denial = Denial::Unauthenticated;
        DashboardError::LoginRequired(
            Json(RedirectErrorResponse::for_denial(denial)),
            denial.redirect_to().to_string(),
        )
    }

    /// Every internal failure on the read side is an infrastructure fault
    pub fn from_internal_error(err: InternalError) -> Self {
        tracing::error!("Dashboard query failed: {}", err);
        DashboardError::InternalError(Json(DashboardErrorResponse {
            error: "internal_error".to_string(),
            message: "An internal error occurred".to_string(),
            status_code: 500,
        }))
    }

    pub fn message(&self) -> String {
        match self {
            DashboardError::LoginRequired(json, _) => json.0.message.clone(),
            DashboardError::InternalError(json) => json.0.message.clone(),
        }
    }
}

impl fmt::Display for DashboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
