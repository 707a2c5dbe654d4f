use super::role::{DASHBOARD_PATH, LOGIN_PATH};
use super::session::Session;

pub const PERMISSION_DENIED_NOTICE: &str = "You do not have permission to access this page.";

/// Outcome of an authorization check
#[derive(Debug, Clone, PartialEq)]
pub enum Access {
    Allow(Session),
    Deny(Denial),
}

/// Why access was refused; each reason sends the client somewhere different
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// No valid session
    Unauthenticated,
    /// Valid session, wrong role or group
    InsufficientPermission,
}

impl Denial {
    pub fn redirect_to(&self) -> &'static str {
        match self {
            Self::Unauthenticated => LOGIN_PATH,
            Self::InsufficientPermission => DASHBOARD_PATH,
        }
    }

    pub fn notice(&self) -> Option<&'static str> {
        match self {
            Self::Unauthenticated => None,
            Self::InsufficientPermission => Some(PERMISSION_DENIED_NOTICE),
        }
    }
}

impl Access {
    pub fn into_result(self) -> Result<Session, Denial> {
        match self {
            Access::Allow(session) => Ok(session),
            Access::Deny(denial) => Err(denial),
        }
    }
}
