use std::collections::HashMap;
use std::fmt;

/// Action codes written to the activity log
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityAction {
    UserRegistered,
    UserLogin,
    UserLogout,
    ProfileUpdated,
    UserActivated,
    UserDeactivated,
    UserRoleChanged,
    UserGroupAdded,
    UserGroupRemoved,
    Custom(String),
}

impl ActivityAction {
    /// Stored representation of the action code
    pub fn as_str(&self) -> &str {
        match self {
            Self::UserRegistered => "USER_REGISTERED",
            Self::UserLogin => "USER_LOGIN",
            Self::UserLogout => "USER_LOGOUT",
            Self::ProfileUpdated => "PROFILE_UPDATED",
            Self::UserActivated => "USER_ACTIVATED",
            Self::UserDeactivated => "USER_DEACTIVATED",
            Self::UserRoleChanged => "USER_ROLE_CHANGED",
            Self::UserGroupAdded => "USER_GROUP_ADDED",
            Self::UserGroupRemoved => "USER_GROUP_REMOVED",
            Self::Custom(s) => s.as_str(),
        }
    }

    pub fn for_activation(active: bool) -> Self {
        if active {
            Self::UserActivated
        } else {
            Self::UserDeactivated
        }
    }
}

impl fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl<T: Into<String>> From<T> for ActivityAction {
    fn from(s: T) -> Self {
        ActivityAction::Custom(s.into())
    }
}

/// Activity entry as built by callers, before the store stamps it
#[derive(Debug, Clone)]
pub struct ActivityEntry {
    pub user_id: i64,
    pub action: ActivityAction,
    pub ip_address: Option<String>,
    pub user_agent: String,
    pub data: HashMap<String, serde_json::Value>,
}

impl ActivityEntry {
    pub fn new(user_id: i64, action: ActivityAction) -> Self {
        Self {
            user_id,
            action,
            ip_address: None,
            user_agent: String::new(),
            data: HashMap::new(),
        }
    }
}
