use std::fmt;

use super::role::Role;

/// Authenticated session resolved from a bearer token
///
/// Passed explicitly into every guarded operation; nothing about the caller
/// is held in ambient state.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user_id: i64,
    /// Raw stored role; may be a value outside the known enumeration
    pub role: String,
    pub groups: Vec<String>,
    pub issued_at: i64,
    pub expires_at: i64,
    pub remember_me: bool,
    pub token_hash: String,
}

impl Session {
    pub fn role(&self) -> Option<Role> {
        self.role.parse().ok()
    }

    pub fn has_role(&self, allowed: &[Role]) -> bool {
        self.role().is_some_and(|role| allowed.contains(&role))
    }

    pub fn in_any_group(&self, allowed: &[&str]) -> bool {
        self.groups.iter().any(|g| allowed.contains(&g.as_str()))
    }

    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at <= now
    }
}

/// Opaque bearer token handed to the client once, at login
pub struct SessionToken(String);

impl SessionToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl<T> From<T> for SessionToken
where
    T: AsRef<str>,
{
    fn from(value: T) -> Self {
        Self(value.as_ref().to_owned())
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[session_token]")
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken([redacted])")
    }
}
