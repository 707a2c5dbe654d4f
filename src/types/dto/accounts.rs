use poem_openapi::{Enum, Object};
use serde::{Deserialize, Serialize};

use crate::types::db::user;
use crate::types::internal::Role;

/// Registration form
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Email address, used as the login name
    pub email: String,

    /// Given name (at most 30 characters)
    pub first_name: String,

    /// Family name (at most 30 characters)
    pub last_name: String,

    /// Kenya National ID number, 7 or 8 digits
    pub national_id: String,

    /// Phone number in Kenyan format, e.g. +254712345678 or 0712345678
    pub phone_number: String,

    /// Role code such as INITIATOR or HR_ADMIN (defaults to INITIATOR)
    pub role: Option<String>,

    /// Department name (defaults to Health)
    pub department: Option<String>,

    /// Password
    pub password1: String,

    /// Password confirmation, must equal `password1`
    pub password2: String,
}

/// Registration result
#[derive(Object, Debug)]
pub struct RegisterResponse {
    /// Where the client should go next
    pub redirect_to: String,

    /// Message to show the user
    pub notice: String,

    /// The created account
    pub user: UserResponse,
}

/// Login form
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Email address
    pub email: String,

    /// Password
    pub password: String,

    /// Keep the session alive for the extended lifetime
    pub remember_me: Option<bool>,
}

/// Login result carrying the session token
#[derive(Object, Debug)]
pub struct LoginResponse {
    /// Opaque session token, sent back as `Authorization: Bearer <token>`
    pub token: String,

    /// Token type (always "Bearer")
    pub token_type: String,

    /// Session expiry (Unix timestamp)
    pub expires_at: i64,

    /// Role code of the logged-in user
    pub role: String,

    /// Role-specific landing page
    pub redirect_to: String,

    /// Message to show the user
    pub notice: String,
}

/// Notice plus redirect, used where no other payload is returned
#[derive(Object, Debug)]
pub struct NoticeResponse {
    /// Where the client should go next
    pub redirect_to: String,

    /// Message to show the user
    pub notice: String,
}

/// Profile changes; omitted fields stay as they are
#[derive(Object, Debug, Default, Serialize, Deserialize)]
pub struct ProfileUpdateRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,

    /// Reference to an already-stored image; an empty string removes it
    pub profile_picture: Option<String>,
}

/// The caller's own profile
#[derive(Object, Debug)]
pub struct ProfileResponse {
    pub user: UserResponse,

    /// Set after a successful update
    pub notice: Option<String>,
}

/// Full view of an account, including group membership
#[derive(Object, Debug)]
pub struct UserResponse {
    pub id: i64,

    /// Public opaque identifier
    pub uuid: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub national_id: String,
    pub phone_number: String,
    pub profile_picture: Option<String>,

    /// Role code
    pub role: String,

    /// Human-readable role name, empty for unknown codes
    pub role_label: String,
    pub department: String,
    pub employee_id: Option<String>,
    pub is_active: bool,

    /// Unix timestamp
    pub date_joined: i64,

    /// Unix timestamp
    pub last_activity: i64,

    /// Authorization groups
    pub groups: Vec<String>,
}

impl UserResponse {
    pub fn from_model(model: user::Model, groups: Vec<String>) -> Self {
        Self {
            full_name: model.full_name(),
            role_label: role_label(&model.role),
            id: model.id,
            uuid: model.uuid,
            email: model.email,
            first_name: model.first_name,
            last_name: model.last_name,
            national_id: model.national_id,
            phone_number: model.phone_number,
            profile_picture: model.profile_picture,
            role: model.role,
            department: model.department,
            employee_id: model.employee_id,
            is_active: model.is_active,
            date_joined: model.date_joined,
            last_activity: model.last_activity,
            groups,
        }
    }
}

/// Row in the user administration list
#[derive(Object, Debug)]
pub struct UserSummary {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub national_id: String,
    pub role: String,
    pub role_label: String,
    pub department: String,
    pub employee_id: Option<String>,
    pub is_active: bool,

    /// Unix timestamp
    pub date_joined: i64,
}

impl From<user::Model> for UserSummary {
    fn from(model: user::Model) -> Self {
        Self {
            full_name: model.full_name(),
            role_label: role_label(&model.role),
            id: model.id,
            email: model.email,
            national_id: model.national_id,
            role: model.role,
            department: model.department,
            employee_id: model.employee_id,
            is_active: model.is_active,
            date_joined: model.date_joined,
        }
    }
}

fn role_label(role: &str) -> String {
    role.parse::<Role>()
        .map(|r| r.label().to_string())
        .unwrap_or_default()
}

/// One entry of the role filter drop-down
#[derive(Object, Debug)]
pub struct RoleChoice {
    /// Role code
    pub value: String,

    /// Display name
    pub label: String,
}

impl RoleChoice {
    pub fn all() -> Vec<RoleChoice> {
        Role::ALL
            .iter()
            .map(|role| RoleChoice {
                value: role.as_str().to_string(),
                label: role.label().to_string(),
            })
            .collect()
    }
}

/// User administration list
#[derive(Object, Debug)]
pub struct UserListResponse {
    /// Matching users, newest-joined first
    pub users: Vec<UserSummary>,

    /// Every selectable role
    pub role_choices: Vec<RoleChoice>,

    /// Role filter as submitted (empty when unfiltered)
    pub current_role: String,

    /// Search text as submitted (empty when unfiltered)
    pub search_term: String,
}

/// Result of an activation toggle
#[derive(Object, Debug)]
pub struct ToggleResponse {
    pub user: UserSummary,

    /// Where the client should go next
    pub redirect_to: String,

    /// Message to show the user
    pub notice: String,
}

/// Role and/or department change
#[derive(Object, Debug, Default, Serialize, Deserialize)]
pub struct AssignmentRequest {
    /// New role code
    pub role: Option<String>,

    /// New department
    pub department: Option<String>,
}

#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[oai(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GroupAction {
    Add,
    Remove,
}

/// Add or remove one group membership
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct GroupChangeRequest {
    /// Group name, e.g. "Panelists"
    pub group: String,

    /// Whether to add or remove the membership
    pub action: GroupAction,
}
