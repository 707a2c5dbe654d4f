//! Role and group authorization checks
//!
//! Endpoints resolve the caller's session first and then compose these
//! checks explicitly. A missing session is always `Denial::Unauthenticated`;
//! a session that fails the check is `Denial::InsufficientPermission`.

use crate::types::internal::{Access, Denial, Role, Session};

/// Roles allowed to list and administer other users
pub const USER_ADMIN_ROLES: [Role; 2] = [Role::HrAdmin, Role::CpsbSecretariat];

pub fn require_authenticated(session: Option<Session>) -> Access {
    match session {
        Some(session) => Access::Allow(session),
        None => Access::Deny(Denial::Unauthenticated),
    }
}

/// Allow when the session's role is one of `allowed`
///
/// A role string outside the known set never matches.
pub fn require_role(session: Option<Session>, allowed: &[Role]) -> Access {
    match session {
        None => Access::Deny(Denial::Unauthenticated),
        Some(session) if session.has_role(allowed) => Access::Allow(session),
        Some(session) => {
            tracing::debug!(
                "User {} with role {} denied; requires one of {:?}",
                session.user_id,
                session.role,
                allowed
            );
            Access::Deny(Denial::InsufficientPermission)
        }
    }
}

/// Allow when the session belongs to any of the named groups
pub fn require_group(session: Option<Session>, allowed_groups: &[&str]) -> Access {
    match session {
        None => Access::Deny(Denial::Unauthenticated),
        Some(session) if session.in_any_group(allowed_groups) => Access::Allow(session),
        Some(session) => {
            tracing::debug!(
                "User {} denied; requires membership in one of {:?}",
                session.user_id,
                allowed_groups
            );
            Access::Deny(Denial::InsufficientPermission)
        }
    }
}
