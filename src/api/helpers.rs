use poem::Request;
use poem_openapi::auth::{Bearer, BearerAuthorization};

use crate::errors::InternalError;
use crate::services::AuthService;
use crate::types::internal::Session;

/// Raw bearer token from the `Authorization` header, if any
///
/// Endpoints read the header themselves rather than declaring a security
/// scheme so that a missing token becomes a redirect instead of a 401.
pub fn bearer_token(req: &Request) -> Option<String> {
    Bearer::from_request(req).ok().map(|bearer| bearer.token)
}

/// Resolve the caller's session; `None` when absent, unknown or expired
pub async fn current_session(
    auth: &AuthService,
    req: &Request,
) -> Result<Option<Session>, InternalError> {
    match bearer_token(req) {
        Some(token) => auth.resolve(&token).await,
        None => Ok(None),
    }
}
