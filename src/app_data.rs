use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::{SecretManager, SessionLifetimes};
use crate::errors::InternalError;
use crate::services::{
    AccountService, ActivityLogger, AuthService, CryptoService, DashboardService,
};
use crate::stores::{
    ActivityStore, CandidateStore, RequisitionStore, SessionStore, UserStore,
};

/// Centralized application data following the main-owned stores pattern
///
/// Every store and service is created once here and shared by the API
/// layer and the CLI.
///
/// ```text
/// main.rs
///   ↓
/// AppData::init(db, lifetimes)
///   ├─ secret_manager
///   ├─ stores: users, sessions, activity, requisitions, candidates
///   ├─ crypto (pepper + session secret)
///   ├─ activity_logger
///   └─ services: accounts, auth, dashboard
/// ```
pub struct AppData {
    pub db: DatabaseConnection,
    pub secret_manager: Arc<SecretManager>,
    pub user_store: Arc<UserStore>,
    pub session_store: Arc<SessionStore>,
    pub activity_store: Arc<ActivityStore>,
    pub requisition_store: Arc<RequisitionStore>,
    pub candidate_store: Arc<CandidateStore>,
    pub crypto: Arc<CryptoService>,
    pub activity_logger: Arc<ActivityLogger>,
    pub account_service: Arc<AccountService>,
    pub auth_service: Arc<AuthService>,
    pub dashboard_service: Arc<DashboardService>,
}

impl AppData {
    /// Initialize all application data from the process environment
    ///
    /// The database should be connected and migrated before calling this.
    ///
    /// # Errors
    ///
    /// Returns `InternalError` when secret manager initialization fails
    pub async fn init(
        db: DatabaseConnection,
        lifetimes: SessionLifetimes,
    ) -> Result<Self, InternalError> {
        tracing::info!("Initializing AppData...");

        tracing::debug!("Initializing secret manager...");
        let secret_manager = SecretManager::init().map_err(|e| {
            InternalError::parse("secret_manager", format!("Secret manager init failed: {}", e))
        })?;
        tracing::debug!("Secret manager initialized");

        let app_data = Self::with_secrets(db, secret_manager, lifetimes);

        tracing::info!("AppData initialization complete");
        Ok(app_data)
    }

    /// Wire stores and services around already-loaded secrets
    pub fn with_secrets(
        db: DatabaseConnection,
        secret_manager: SecretManager,
        lifetimes: SessionLifetimes,
    ) -> Self {
        tracing::debug!("Creating stores...");
        let user_store = Arc::new(UserStore::new(db.clone()));
        let session_store = Arc::new(SessionStore::new(db.clone()));
        let activity_store = Arc::new(ActivityStore::new(db.clone()));
        let requisition_store = Arc::new(RequisitionStore::new(db.clone()));
        let candidate_store = Arc::new(CandidateStore::new(db.clone()));
        tracing::debug!("Stores created");

        let crypto = Arc::new(CryptoService::new(
            secret_manager.password_pepper(),
            secret_manager.session_secret(),
        ));
        let activity_logger = Arc::new(ActivityLogger::new(activity_store.clone()));

        let account_service = Arc::new(AccountService::new(
            user_store.clone(),
            crypto.clone(),
            activity_logger.clone(),
        ));
        let auth_service = Arc::new(AuthService::new(
            account_service.clone(),
            user_store.clone(),
            session_store.clone(),
            crypto.clone(),
            activity_logger.clone(),
            lifetimes,
        ));
        let dashboard_service = Arc::new(DashboardService::new(
            requisition_store.clone(),
            candidate_store.clone(),
        ));

        Self {
            db,
            secret_manager: Arc::new(secret_manager),
            user_store,
            session_store,
            activity_store,
            requisition_store,
            candidate_store,
            crypto,
            activity_logger,
            account_service,
            auth_service,
            dashboard_service,
        }
    }
}
