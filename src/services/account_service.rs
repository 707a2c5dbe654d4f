use std::sync::Arc;

use crate::errors::InternalError;
use crate::errors::internal::account::{DUPLICATE_EMAIL, DUPLICATE_NATIONAL_ID};
use crate::errors::internal::{AccountError, ValidationErrors};
use crate::services::activity_logger::ActivityLogger;
use crate::services::crypto::CryptoService;
use crate::services::validation;
use crate::stores::{NewUser, ProfileChanges, UserStore};
use crate::types::db::user;
use crate::types::internal::context::RequestContext;
use crate::types::internal::{ActivityAction, Group, Role};

/// Registration form as submitted, before any normalization
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub national_id: String,
    pub phone_number: String,
    pub role: Option<String>,
    pub department: Option<String>,
    pub password1: String,
    pub password2: String,
}

/// Profile form; absent fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    /// `Some(None)` clears the picture
    pub profile_picture: Option<Option<String>>,
}

/// Identity operations: registration, credential checks, profile and
/// administrative changes
///
/// Authorization is the caller's job; these methods assume the guard has
/// already let the actor through.
pub struct AccountService {
    users: Arc<UserStore>,
    crypto: Arc<CryptoService>,
    activity: Arc<ActivityLogger>,
}

impl AccountService {
    pub fn new(
        users: Arc<UserStore>,
        crypto: Arc<CryptoService>,
        activity: Arc<ActivityLogger>,
    ) -> Self {
        Self {
            users,
            crypto,
            activity,
        }
    }

    /// Self-service registration
    pub async fn register(
        &self,
        ctx: &RequestContext,
        registration: Registration,
    ) -> Result<user::Model, InternalError> {
        self.create_user(ctx, registration, None).await
    }

    /// Create an account, optionally recording which user created it
    ///
    /// All field errors are collected before anything is written. The new
    /// user is placed in the group that matches their role.
    pub async fn create_user(
        &self,
        ctx: &RequestContext,
        registration: Registration,
        created_by: Option<i64>,
    ) -> Result<user::Model, InternalError> {
        let (new_user, password) = self.validate_registration(registration).await?;
        let password_hash = self.crypto.hash_password(&password)?;
        let new_user = NewUser {
            password_hash,
            created_by,
            ..new_user
        };

        let user = self.users.insert(new_user).await?;

        tracing::info!(
            "User {} registered with role {} ({})",
            user.id,
            user.role,
            ctx.actor
        );

        self.activity
            .builder(user.id, ActivityAction::UserRegistered)
            .with_context(ctx)
            .add_field("role", &user.role)
            .record()
            .await;

        Ok(user)
    }

    async fn validate_registration(
        &self,
        registration: Registration,
    ) -> Result<(NewUser, String), InternalError> {
        let mut errors = ValidationErrors::new();

        let email = validation::normalize_email(&registration.email);
        let email_check = validation::validate_email(&email);
        if email_check.is_ok() && self.users.email_exists(&email).await? {
            errors.add("email", DUPLICATE_EMAIL);
        } else {
            errors.check("email", email_check);
        }

        let first_name = registration.first_name.trim().to_string();
        let last_name = registration.last_name.trim().to_string();
        errors.check("first_name", validation::validate_name(&first_name));
        errors.check("last_name", validation::validate_name(&last_name));

        let national_id = registration.national_id.trim().to_string();
        if !national_id.is_empty() && self.users.national_id_exists(&national_id).await? {
            errors.add("national_id", DUPLICATE_NATIONAL_ID);
        } else {
            errors.check(
                "national_id",
                validation::validate_national_id_format(&national_id),
            );
        }

        let phone_number = validation::normalize_phone(&registration.phone_number);
        errors.check("phone_number", validation::validate_phone(&phone_number));

        let role = match registration.role.as_deref().map(str::trim) {
            None | Some("") => Role::default(),
            Some(raw) => match validation::parse_role(raw) {
                Ok(role) => role,
                Err(message) => {
                    errors.add("role", message);
                    Role::default()
                }
            },
        };

        let department = validation::normalize_department(registration.department.as_deref());
        errors.check("department", validation::validate_department(&department));

        validation::validate_passwords(&mut errors, &registration.password1, &registration.password2);

        errors.into_result()?;

        let new_user = NewUser {
            email,
            password_hash: String::new(),
            first_name,
            last_name,
            national_id,
            phone_number,
            role: role.as_str().to_string(),
            department,
            group_name: role.group().name().to_string(),
            created_by: None,
        };
        Ok((new_user, registration.password1))
    }

    /// Check an email/password pair
    ///
    /// Returns `None` for an unknown email and for a wrong password alike.
    /// Inactive users are returned; refusing them is the login flow's job.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<user::Model>, InternalError> {
        let email = validation::normalize_email(email);

        let Some(user) = self.users.find_by_email(&email).await? else {
            self.crypto.burn_verification(password)?;
            return Ok(None);
        };

        if self.crypto.verify_password(&user.password_hash, password)? {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    pub async fn update_profile(
        &self,
        ctx: &RequestContext,
        user_id: i64,
        update: ProfileUpdate,
    ) -> Result<user::Model, InternalError> {
        let mut errors = ValidationErrors::new();

        let first_name = update.first_name.map(|n| n.trim().to_string());
        if let Some(name) = &first_name {
            errors.check("first_name", validation::validate_name(name));
        }
        let last_name = update.last_name.map(|n| n.trim().to_string());
        if let Some(name) = &last_name {
            errors.check("last_name", validation::validate_name(name));
        }
        let phone_number = update
            .phone_number
            .map(|p| validation::normalize_phone(&p));
        if let Some(phone) = &phone_number {
            errors.check("phone_number", validation::validate_phone(phone));
        }
        errors.into_result()?;

        let user = self
            .users
            .update_profile(
                user_id,
                ProfileChanges {
                    first_name,
                    last_name,
                    phone_number,
                    profile_picture: update.profile_picture,
                },
            )
            .await?;

        self.activity
            .builder(user.id, ActivityAction::ProfileUpdated)
            .with_context(ctx)
            .record()
            .await;

        Ok(user)
    }

    /// Activate or deactivate `target_id` on behalf of `actor_id`
    ///
    /// An actor can never deactivate themself; the row is left untouched.
    pub async fn set_active(
        &self,
        ctx: &RequestContext,
        actor_id: i64,
        target_id: i64,
        active: bool,
    ) -> Result<user::Model, InternalError> {
        if actor_id == target_id && !active {
            tracing::warn!("User {} attempted to deactivate themself", actor_id);
            return Err(AccountError::self_deactivation(actor_id));
        }

        let user = self.users.set_active(target_id, active).await?;

        tracing::info!(
            "User {} {} by user {}",
            user.id,
            if active { "activated" } else { "deactivated" },
            actor_id
        );

        self.activity
            .builder(actor_id, ActivityAction::for_activation(active))
            .with_context(ctx)
            .add_field("target_user", &user.email)
            .record()
            .await;

        Ok(user)
    }

    /// Flip the active flag; any toggle of one's own account is refused
    pub async fn toggle_active(
        &self,
        ctx: &RequestContext,
        actor_id: i64,
        target_id: i64,
    ) -> Result<user::Model, InternalError> {
        if actor_id == target_id {
            tracing::warn!("User {} attempted to toggle their own account", actor_id);
            return Err(AccountError::self_deactivation(actor_id));
        }

        let target = self.get_by_id(target_id).await?;
        self.set_active(ctx, actor_id, target_id, !target.is_active).await
    }

    /// Change a user's role and/or department; group membership is kept
    pub async fn assign(
        &self,
        ctx: &RequestContext,
        actor_id: i64,
        target_id: i64,
        role: Option<String>,
        department: Option<String>,
    ) -> Result<user::Model, InternalError> {
        let role = match role {
            Some(raw) => Some(
                raw.trim()
                    .parse::<Role>()
                    .map_err(|e| AccountError::UnknownRole(e.0))?,
            ),
            None => None,
        };

        let department = match department {
            Some(raw) => {
                let department = validation::normalize_department(Some(&raw));
                validation::validate_department(&department)
                    .map_err(|message| AccountError::validation("department", message))?;
                Some(department)
            }
            None => None,
        };

        let user = self
            .users
            .assign(target_id, role.map(|r| r.as_str().to_string()), department)
            .await?;

        tracing::info!(
            "User {} assigned role {} in {} by user {}",
            user.id,
            user.role,
            user.department,
            actor_id
        );

        self.activity
            .builder(actor_id, ActivityAction::UserRoleChanged)
            .with_context(ctx)
            .add_field("target_user", &user.email)
            .add_field("role", &user.role)
            .add_field("department", &user.department)
            .record()
            .await;

        Ok(user)
    }

    pub async fn add_to_group(
        &self,
        ctx: &RequestContext,
        actor_id: i64,
        target_id: i64,
        group_name: &str,
    ) -> Result<Vec<String>, InternalError> {
        let group = Self::known_group(group_name)?;
        let target = self.get_by_id(target_id).await?;

        self.users.add_group(target.id, group.name()).await?;

        self.activity
            .builder(actor_id, ActivityAction::UserGroupAdded)
            .with_context(ctx)
            .add_field("target_user", &target.email)
            .add_field("group", group.name())
            .record()
            .await;

        self.users.groups_for(target.id).await
    }

    pub async fn remove_from_group(
        &self,
        ctx: &RequestContext,
        actor_id: i64,
        target_id: i64,
        group_name: &str,
    ) -> Result<Vec<String>, InternalError> {
        let group = Self::known_group(group_name)?;
        let target = self.get_by_id(target_id).await?;

        if self.users.remove_group(target.id, group.name()).await? {
            self.activity
                .builder(actor_id, ActivityAction::UserGroupRemoved)
                .with_context(ctx)
                .add_field("target_user", &target.email)
                .add_field("group", group.name())
                .record()
                .await;
        }

        self.users.groups_for(target.id).await
    }

    fn known_group(group_name: &str) -> Result<Group, InternalError> {
        Group::from_name(group_name.trim())
            .ok_or_else(|| InternalError::from(AccountError::UnknownGroup(group_name.to_string())))
    }

    /// Users newest-joined first, filtered by role and free text
    pub async fn search(
        &self,
        role: Option<&str>,
        query: Option<&str>,
    ) -> Result<Vec<user::Model>, InternalError> {
        self.users.search(role, query).await
    }

    pub async fn get_by_id(&self, user_id: i64) -> Result<user::Model, InternalError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AccountError::user_not_found(user_id))
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<user::Model>, InternalError> {
        self.users
            .find_by_email(&validation::normalize_email(email))
            .await
    }

    pub async fn groups_for(&self, user_id: i64) -> Result<Vec<String>, InternalError> {
        self.users.groups_for(user_id).await
    }
}
