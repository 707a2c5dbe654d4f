use std::sync::Arc;

use poem::Request;
use poem_openapi::{
    ApiResponse, OpenApi, Tags,
    param::{Path, Query},
    payload::Json,
};

use crate::api::helpers;
use crate::errors::AccountsError;
use crate::services::guard::{self, USER_ADMIN_ROLES};
use crate::services::{AccountService, AuthService, ProfileUpdate, Registration};
use crate::types::dto::accounts::{
    AssignmentRequest, GroupAction, GroupChangeRequest, LoginRequest, LoginResponse,
    NoticeResponse, ProfileResponse, ProfileUpdateRequest, RegisterRequest, RegisterResponse,
    RoleChoice, ToggleResponse, UserListResponse, UserResponse, UserSummary,
};
use crate::types::internal::context::RequestContext;
use crate::types::internal::role::{DASHBOARD_PATH, LOGIN_PATH};
use crate::types::db::user;
use crate::types::internal::Session;

const USER_MANAGEMENT_PATH: &str = "/accounts/users";

/// Registration, login, profile and user administration endpoints
pub struct AccountsApi {
    accounts: Arc<AccountService>,
    auth: Arc<AuthService>,
}

impl AccountsApi {
    pub fn new(accounts: Arc<AccountService>, auth: Arc<AuthService>) -> Self {
        Self { accounts, auth }
    }

    async fn session(&self, req: &Request) -> Result<Option<Session>, AccountsError> {
        helpers::current_session(&self.auth, req)
            .await
            .map_err(AccountsError::from_internal_error)
    }

    /// Anonymous-only endpoints bounce callers who are already logged in
    async fn reject_if_authenticated(&self, req: &Request) -> Result<(), AccountsError> {
        match self.session(req).await? {
            Some(_) => Err(AccountsError::already_authenticated()),
            None => Ok(()),
        }
    }

    async fn require_authenticated(&self, req: &Request) -> Result<Session, AccountsError> {
        guard::require_authenticated(self.session(req).await?)
            .into_result()
            .map_err(AccountsError::from_denial)
    }

    async fn require_user_admin(&self, req: &Request) -> Result<Session, AccountsError> {
        guard::require_role(self.session(req).await?, &USER_ADMIN_ROLES)
            .into_result()
            .map_err(AccountsError::from_denial)
    }

    async fn user_response(&self, model: user::Model) -> Result<UserResponse, AccountsError> {
        let groups = self
            .accounts
            .groups_for(model.id)
            .await
            .map_err(AccountsError::from_internal_error)?;
        Ok(UserResponse::from_model(model, groups))
    }
}

#[derive(ApiResponse, Debug)]
pub enum RegisterApiResponse {
    /// Account created; continue to the login page
    #[oai(status = 201)]
    Created(Json<RegisterResponse>),
}

/// API tags for account endpoints
#[derive(Tags)]
enum AccountsTags {
    /// Registration, login and logout
    Authentication,
    /// The caller's own profile
    Profile,
    /// User administration (HR_ADMIN, CPSB_SECRETARIAT)
    UserManagement,
}

#[OpenApi(prefix_path = "/accounts")]
impl AccountsApi {
    /// Register a new account
    #[oai(path = "/register", method = "post", tag = "AccountsTags::Authentication")]
    async fn register(
        &self,
        req: &Request,
        body: Json<RegisterRequest>,
    ) -> Result<RegisterApiResponse, AccountsError> {
        self.reject_if_authenticated(req).await?;

        let ctx = RequestContext::from_request(req);
        let body = body.0;
        let registration = Registration {
            email: body.email,
            first_name: body.first_name,
            last_name: body.last_name,
            national_id: body.national_id,
            phone_number: body.phone_number,
            role: body.role,
            department: body.department,
            password1: body.password1,
            password2: body.password2,
        };

        let user = self
            .accounts
            .register(&ctx, registration)
            .await
            .map_err(AccountsError::from_internal_error)?;

        Ok(RegisterApiResponse::Created(Json(RegisterResponse {
            redirect_to: LOGIN_PATH.to_string(),
            notice: "Registration successful! Please login.".to_string(),
            user: self.user_response(user).await?,
        })))
    }

    /// Log in with email and password to receive a session token
    #[oai(path = "/login", method = "post", tag = "AccountsTags::Authentication")]
    async fn login(
        &self,
        req: &Request,
        body: Json<LoginRequest>,
    ) -> Result<Json<LoginResponse>, AccountsError> {
        self.reject_if_authenticated(req).await?;

        let ctx = RequestContext::from_request(req);
        let outcome = self
            .auth
            .login(&ctx, &body.email, &body.password, body.remember_me.unwrap_or(false))
            .await
            .map_err(AccountsError::from_internal_error)?;

        let redirect_to = outcome
            .session
            .role()
            .map(|role| role.landing_path())
            .unwrap_or(DASHBOARD_PATH);

        Ok(Json(LoginResponse {
            notice: format!("Welcome back, {}!", outcome.user.full_name()),
            token: outcome.token.into_inner(),
            token_type: "Bearer".to_string(),
            expires_at: outcome.session.expires_at,
            role: outcome.session.role.clone(),
            redirect_to: redirect_to.to_string(),
        }))
    }

    /// End the current session
    #[oai(path = "/logout", method = "post", tag = "AccountsTags::Authentication")]
    async fn logout(&self, req: &Request) -> Result<Json<NoticeResponse>, AccountsError> {
        let session = self.require_authenticated(req).await?;
        let ctx = RequestContext::from_request(req);

        self.auth
            .logout(&ctx, &session)
            .await
            .map_err(AccountsError::from_internal_error)?;

        Ok(Json(NoticeResponse {
            redirect_to: LOGIN_PATH.to_string(),
            notice: "You have been successfully logged out.".to_string(),
        }))
    }

    /// View the caller's profile
    #[oai(path = "/profile", method = "get", tag = "AccountsTags::Profile")]
    async fn profile(&self, req: &Request) -> Result<Json<ProfileResponse>, AccountsError> {
        let session = self.require_authenticated(req).await?;

        let user = self
            .accounts
            .get_by_id(session.user_id)
            .await
            .map_err(AccountsError::from_internal_error)?;

        Ok(Json(ProfileResponse {
            user: self.user_response(user).await?,
            notice: None,
        }))
    }

    /// Update the caller's name, phone number or picture
    #[oai(path = "/profile", method = "post", tag = "AccountsTags::Profile")]
    async fn update_profile(
        &self,
        req: &Request,
        body: Json<ProfileUpdateRequest>,
    ) -> Result<Json<ProfileResponse>, AccountsError> {
        let session = self.require_authenticated(req).await?;
        let ctx = RequestContext::from_request(req);
        let body = body.0;

        let update = ProfileUpdate {
            first_name: body.first_name,
            last_name: body.last_name,
            phone_number: body.phone_number,
            profile_picture: body
                .profile_picture
                .map(|p| if p.trim().is_empty() { None } else { Some(p) }),
        };

        let user = self
            .accounts
            .update_profile(&ctx, session.user_id, update)
            .await
            .map_err(AccountsError::from_internal_error)?;

        Ok(Json(ProfileResponse {
            user: self.user_response(user).await?,
            notice: Some("Profile updated successfully!".to_string()),
        }))
    }

    /// List users, optionally filtered by role and free-text search
    #[oai(path = "/users", method = "get", tag = "AccountsTags::UserManagement")]
    async fn list_users(
        &self,
        req: &Request,
        role: Query<Option<String>>,
        search: Query<Option<String>>,
    ) -> Result<Json<UserListResponse>, AccountsError> {
        self.require_user_admin(req).await?;

        let users = self
            .accounts
            .search(role.0.as_deref(), search.0.as_deref())
            .await
            .map_err(AccountsError::from_internal_error)?;

        Ok(Json(UserListResponse {
            users: users.into_iter().map(UserSummary::from).collect(),
            role_choices: RoleChoice::all(),
            current_role: role.0.unwrap_or_default(),
            search_term: search.0.unwrap_or_default(),
        }))
    }

    /// Activate or deactivate another user's account
    #[oai(path = "/users/:id/toggle", method = "post", tag = "AccountsTags::UserManagement")]
    async fn toggle_user(
        &self,
        req: &Request,
        id: Path<i64>,
    ) -> Result<Json<ToggleResponse>, AccountsError> {
        let session = self.require_user_admin(req).await?;
        let ctx = RequestContext::from_request(req);

        let user = self
            .accounts
            .toggle_active(&ctx, session.user_id, id.0)
            .await
            .map_err(AccountsError::from_internal_error)?;

        let action = if user.is_active { "activated" } else { "deactivated" };
        Ok(Json(ToggleResponse {
            notice: format!("User {} {} successfully!", user.full_name(), action),
            redirect_to: USER_MANAGEMENT_PATH.to_string(),
            user: UserSummary::from(user),
        }))
    }

    /// Change a user's role and/or department
    #[oai(path = "/users/:id/assignment", method = "post", tag = "AccountsTags::UserManagement")]
    async fn assign_user(
        &self,
        req: &Request,
        id: Path<i64>,
        body: Json<AssignmentRequest>,
    ) -> Result<Json<UserResponse>, AccountsError> {
        let session = self.require_user_admin(req).await?;
        let ctx = RequestContext::from_request(req);
        let body = body.0;

        let user = self
            .accounts
            .assign(&ctx, session.user_id, id.0, body.role, body.department)
            .await
            .map_err(AccountsError::from_internal_error)?;

        Ok(Json(self.user_response(user).await?))
    }

    /// Add a user to, or remove them from, an authorization group
    #[oai(path = "/users/:id/groups", method = "post", tag = "AccountsTags::UserManagement")]
    async fn change_groups(
        &self,
        req: &Request,
        id: Path<i64>,
        body: Json<GroupChangeRequest>,
    ) -> Result<Json<UserResponse>, AccountsError> {
        let session = self.require_user_admin(req).await?;
        let ctx = RequestContext::from_request(req);

        let groups = match body.action {
            GroupAction::Add => {
                self.accounts
                    .add_to_group(&ctx, session.user_id, id.0, &body.group)
                    .await
            }
            GroupAction::Remove => {
                self.accounts
                    .remove_from_group(&ctx, session.user_id, id.0, &body.group)
                    .await
            }
        }
        .map_err(AccountsError::from_internal_error)?;

        let user = self
            .accounts
            .get_by_id(id.0)
            .await
            .map_err(AccountsError::from_internal_error)?;

        Ok(Json(UserResponse::from_model(user, groups)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_data::AppData;
    use crate::test::utils::setup_test_app;

    const PASSWORD: &str = "Recruit2024!";

    fn api(app: &AppData) -> AccountsApi {
        AccountsApi::new(app.account_service.clone(), app.auth_service.clone())
    }

    fn anonymous() -> Request {
        Request::builder().finish()
    }

    fn with_token(token: &str) -> Request {
        Request::builder()
            .header("Authorization", format!("Bearer {}", token))
            .finish()
    }

    fn register_request(email: &str, national_id: &str, role: Option<&str>) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            first_name: "Wambui".to_string(),
            last_name: "Njeri".to_string(),
            national_id: national_id.to_string(),
            phone_number: "0712345678".to_string(),
            role: role.map(str::to_string),
            department: None,
            password1: PASSWORD.to_string(),
            password2: PASSWORD.to_string(),
        }
    }

    /// Register through the endpoint and return the new user's id
    async fn register(api: &AccountsApi, email: &str, national_id: &str, role: &str) -> i64 {
        match api
            .register(&anonymous(), Json(register_request(email, national_id, Some(role))))
            .await
            .unwrap()
        {
            RegisterApiResponse::Created(body) => body.0.user.id,
        }
    }

    async fn login(api: &AccountsApi, email: &str) -> LoginResponse {
        api.login(
            &anonymous(),
            Json(LoginRequest {
                email: email.to_string(),
                password: PASSWORD.to_string(),
                remember_me: None,
            }),
        )
        .await
        .unwrap()
        .0
    }

    #[tokio::test]
    async fn test_register_redirects_to_login() {
        let app = setup_test_app().await;
        let api = api(&app);

        let RegisterApiResponse::Created(body) = api
            .register(&anonymous(), Json(register_request("wambui@example.com", "12345678", None)))
            .await
            .unwrap();

        assert_eq!(body.0.redirect_to, "/accounts/login");
        assert_eq!(body.0.notice, "Registration successful! Please login.");
        assert_eq!(body.0.user.role, "INITIATOR");
        assert_eq!(body.0.user.groups, vec!["Initiators".to_string()]);
    }

    #[tokio::test]
    async fn test_register_duplicate_email_is_field_error() {
        let app = setup_test_app().await;
        let api = api(&app);
        register(&api, "wambui@example.com", "12345678", "INITIATOR").await;

        let err = api
            .register(&anonymous(), Json(register_request("WAMBUI@example.com", "87654321", None)))
            .await
            .unwrap_err();

        match err {
            AccountsError::ValidationFailed(json) => {
                assert!(json.0.field_errors.contains_key("email"));
            }
            other => panic!("Expected ValidationFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_login_returns_token_and_landing_path() {
        let app = setup_test_app().await;
        let api = api(&app);
        register(&api, "chief@example.com", "12345678", "CHIEF_OFFICER").await;

        let response = login(&api, "chief@example.com").await;

        assert_eq!(response.token_type, "Bearer");
        assert!(!response.token.is_empty());
        assert_eq!(response.role, "CHIEF_OFFICER");
        assert_eq!(response.redirect_to, "/requisitions/pending-approvals");
        assert_eq!(response.notice, "Welcome back, Wambui Njeri!");
    }

    #[tokio::test]
    async fn test_login_with_bad_password_is_generic() {
        let app = setup_test_app().await;
        let api = api(&app);
        register(&api, "wambui@example.com", "12345678", "INITIATOR").await;

        let err = api
            .login(
                &anonymous(),
                Json(LoginRequest {
                    email: "wambui@example.com".to_string(),
                    password: "wrong".to_string(),
                    remember_me: Some(true),
                }),
            )
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 401);
        assert_eq!(err.message(), crate::errors::api::accounts::INVALID_LOGIN_MESSAGE);
    }

    #[tokio::test]
    async fn test_authenticated_caller_cannot_register_or_login_again() {
        let app = setup_test_app().await;
        let api = api(&app);
        register(&api, "wambui@example.com", "12345678", "INITIATOR").await;
        let token = login(&api, "wambui@example.com").await.token;

        let err = api
            .register(
                &with_token(&token),
                Json(register_request("second@example.com", "87654321", None)),
            )
            .await
            .unwrap_err();

        match err {
            AccountsError::AlreadyAuthenticated(_, location) => assert_eq!(location, "/dashboard"),
            other => panic!("Expected AlreadyAuthenticated, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_profile_requires_session() {
        let app = setup_test_app().await;
        let api = api(&app);

        match api.profile(&anonymous()).await.unwrap_err() {
            AccountsError::LoginRequired(_, location) => assert_eq!(location, "/accounts/login"),
            other => panic!("Expected LoginRequired, got {:?}", other),
        }

        match api.profile(&with_token("bm9wZQ==")).await.unwrap_err() {
            AccountsError::LoginRequired(_, _) => {}
            other => panic!("Expected LoginRequired, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_profile_update_round_trip() {
        let app = setup_test_app().await;
        let api = api(&app);
        register(&api, "wambui@example.com", "12345678", "INITIATOR").await;
        let token = login(&api, "wambui@example.com").await.token;

        let updated = api
            .update_profile(
                &with_token(&token),
                Json(ProfileUpdateRequest {
                    last_name: Some("Kariuki".to_string()),
                    profile_picture: Some("profile_pics/w.png".to_string()),
                    ..Default::default()
                }),
            )
            .await
            .unwrap();
        assert_eq!(updated.0.notice.as_deref(), Some("Profile updated successfully!"));
        assert_eq!(updated.0.user.full_name, "Wambui Kariuki");

        // An empty picture clears it
        let cleared = api
            .update_profile(
                &with_token(&token),
                Json(ProfileUpdateRequest {
                    profile_picture: Some(String::new()),
                    ..Default::default()
                }),
            )
            .await
            .unwrap();
        assert_eq!(cleared.0.user.profile_picture, None);

        let viewed = api.profile(&with_token(&token)).await.unwrap();
        assert_eq!(viewed.0.user.last_name, "Kariuki");
        assert!(viewed.0.notice.is_none());
    }

    #[tokio::test]
    async fn test_user_list_is_restricted_to_user_admins() {
        let app = setup_test_app().await;
        let api = api(&app);
        register(&api, "initiator@example.com", "12345678", "INITIATOR").await;
        let token = login(&api, "initiator@example.com").await.token;

        let filters = [
            (None, None),
            (Some("HR_ADMIN".to_string()), Some("x".to_string())),
        ];
        for (role, search) in filters {
            let err = api
                .list_users(&with_token(&token), Query(role), Query(search))
                .await
                .unwrap_err();

            match err {
                AccountsError::PermissionDenied(body, location) => {
                    assert_eq!(location, "/dashboard");
                    assert_eq!(body.0.message, "You do not have permission to access this page.");
                }
                other => panic!("Expected PermissionDenied, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_user_list_filters_and_is_repeatable() {
        let app = setup_test_app().await;
        let api = api(&app);
        register(&api, "admin@example.com", "11111111", "HR_ADMIN").await;
        register(&api, "panel@example.com", "22222222", "PANELIST").await;
        register(&api, "chief@example.com", "33333333", "CHIEF_OFFICER").await;
        let token = login(&api, "admin@example.com").await.token;

        let all = api
            .list_users(&with_token(&token), Query(None), Query(None))
            .await
            .unwrap();
        assert_eq!(all.0.users.len(), 3);
        assert_eq!(all.0.role_choices.len(), 9);

        let first = api
            .list_users(
                &with_token(&token),
                Query(Some("PANELIST".to_string())),
                Query(Some("panel".to_string())),
            )
            .await
            .unwrap();
        let second = api
            .list_users(
                &with_token(&token),
                Query(Some("PANELIST".to_string())),
                Query(Some("panel".to_string())),
            )
            .await
            .unwrap();

        let ids = |r: &UserListResponse| r.users.iter().map(|u| u.id).collect::<Vec<_>>();
        assert_eq!(ids(&first.0), ids(&second.0));
        assert_eq!(first.0.users.len(), 1);
        assert_eq!(first.0.users[0].email, "panel@example.com");
        assert_eq!(first.0.current_role, "PANELIST");
        assert_eq!(first.0.search_term, "panel");
    }

    #[tokio::test]
    async fn test_toggle_self_is_denied_and_other_is_flipped() {
        let app = setup_test_app().await;
        let api = api(&app);
        let admin_id = register(&api, "admin@example.com", "11111111", "CPSB_SECRETARIAT").await;
        let target_id = register(&api, "target@example.com", "22222222", "INITIATOR").await;
        let token = login(&api, "admin@example.com").await.token;

        let err = api
            .toggle_user(&with_token(&token), Path(admin_id))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 403);
        assert!(app.account_service.get_by_id(admin_id).await.unwrap().is_active);

        let toggled = api
            .toggle_user(&with_token(&token), Path(target_id))
            .await
            .unwrap();
        assert!(!toggled.0.user.is_active);
        assert_eq!(toggled.0.notice, "User Wambui Njeri deactivated successfully!");
        assert_eq!(toggled.0.redirect_to, "/accounts/users");

        let missing = api
            .toggle_user(&with_token(&token), Path(9_999))
            .await
            .unwrap_err();
        assert_eq!(missing.status_code(), 404);
    }

    #[tokio::test]
    async fn test_assignment_and_group_changes() {
        let app = setup_test_app().await;
        let api = api(&app);
        register(&api, "admin@example.com", "11111111", "HR_ADMIN").await;
        let target_id = register(&api, "target@example.com", "22222222", "INITIATOR").await;
        let token = login(&api, "admin@example.com").await.token;

        let assigned = api
            .assign_user(
                &with_token(&token),
                Path(target_id),
                Json(AssignmentRequest {
                    role: Some("HR_SECRETARIAT".to_string()),
                    department: Some("Public Service".to_string()),
                }),
            )
            .await
            .unwrap();
        assert_eq!(assigned.0.role, "HR_SECRETARIAT");
        assert_eq!(assigned.0.department, "Public Service");

        let grouped = api
            .change_groups(
                &with_token(&token),
                Path(target_id),
                Json(GroupChangeRequest {
                    group: "HR Secretariat".to_string(),
                    action: GroupAction::Add,
                }),
            )
            .await
            .unwrap();
        assert!(grouped.0.groups.contains(&"HR Secretariat".to_string()));

        let err = api
            .change_groups(
                &with_token(&token),
                Path(target_id),
                Json(GroupChangeRequest {
                    group: "Wizards".to_string(),
                    action: GroupAction::Remove,
                }),
            )
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_logout_ends_session() {
        let app = setup_test_app().await;
        let api = api(&app);
        register(&api, "wambui@example.com", "12345678", "INITIATOR").await;
        let token = login(&api, "wambui@example.com").await.token;

        let response = api.logout(&with_token(&token)).await.unwrap();
        assert_eq!(response.0.redirect_to, "/accounts/login");
        assert_eq!(response.0.notice, "You have been successfully logged out.");

        assert!(matches!(
            api.logout(&with_token(&token)).await.unwrap_err(),
            AccountsError::LoginRequired(_, _)
        ));
    }
}
