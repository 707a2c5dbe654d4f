use std::sync::Arc;

use chrono::Utc;

use crate::config::SessionLifetimes;
use crate::errors::InternalError;
use crate::errors::internal::AccountError;
use crate::services::account_service::AccountService;
use crate::services::activity_logger::ActivityLogger;
use crate::services::crypto::CryptoService;
use crate::stores::{SessionStore, UserStore};
use crate::types::db::user;
use crate::types::internal::context::RequestContext;
use crate::types::internal::{ActivityAction, Session, SessionToken};

/// Result of a successful login
#[derive(Debug)]
pub struct LoginOutcome {
    /// Bearer token handed to the client; only its HMAC is stored
    pub token: SessionToken,
    pub session: Session,
    pub user: user::Model,
}

/// Credential and session manager
///
/// Sessions are server-side rows keyed by the HMAC of an opaque token.
pub struct AuthService {
    accounts: Arc<AccountService>,
    users: Arc<UserStore>,
    sessions: Arc<SessionStore>,
    crypto: Arc<CryptoService>,
    activity: Arc<ActivityLogger>,
    lifetimes: SessionLifetimes,
}

impl AuthService {
    pub fn new(
        accounts: Arc<AccountService>,
        users: Arc<UserStore>,
        sessions: Arc<SessionStore>,
        crypto: Arc<CryptoService>,
        activity: Arc<ActivityLogger>,
        lifetimes: SessionLifetimes,
    ) -> Self {
        Self {
            accounts,
            users,
            sessions,
            crypto,
            activity,
            lifetimes,
        }
    }

    /// Authenticate, check the account may log in, then open a session
    ///
    /// Unknown email and wrong password both yield `InvalidCredentials`.
    /// The inactive check runs only after the password has been verified.
    pub async fn login(
        &self,
        ctx: &RequestContext,
        email: &str,
        password: &str,
        remember_me: bool,
    ) -> Result<LoginOutcome, InternalError> {
        let user = self
            .accounts
            .authenticate(email, password)
            .await?
            .ok_or_else(AccountError::invalid_credentials)?;

        if !user.is_active {
            return Err(AccountError::account_inactive(user.id));
        }

        let token = self.crypto.generate_session_token();
        let token_hash = self.crypto.hash_session_token(token.as_str())?;
        let issued_at = Utc::now().timestamp();
        let expires_at = issued_at + self.lifetimes.for_remember_me(remember_me).num_seconds();

        // The session row goes in last, so a failed login never leaves one behind
        self.users.touch(user.id).await?;
        let groups = self.users.groups_for(user.id).await?;

        self.sessions
            .create(token_hash.clone(), user.id, issued_at, expires_at, remember_me)
            .await?;

        tracing::info!("User {} logged in (remember_me: {})", user.id, remember_me);

        self.activity
            .builder(user.id, ActivityAction::UserLogin)
            .with_context(ctx)
            .record()
            .await;

        let session = Session {
            user_id: user.id,
            role: user.role.clone(),
            groups,
            issued_at,
            expires_at,
            remember_me,
            token_hash,
        };

        Ok(LoginOutcome {
            token,
            session,
            user,
        })
    }

    /// Look up the session behind a bearer token
    ///
    /// Unknown tokens, expired sessions and sessions of deactivated users all
    /// resolve to `None`; the latter two are deleted on sight.
    pub async fn resolve(&self, token: &str) -> Result<Option<Session>, InternalError> {
        let token_hash = self.crypto.hash_session_token(token)?;

        let Some(row) = self.sessions.find(&token_hash).await? else {
            return Ok(None);
        };

        if row.expires_at <= Utc::now().timestamp() {
            tracing::debug!("Session for user {} expired", row.user_id);
            self.sessions.delete(&token_hash).await?;
            return Ok(None);
        }

        let user = match self.users.find_by_id(row.user_id).await? {
            Some(user) if user.is_active => user,
            _ => {
                tracing::debug!("Session owner {} is missing or inactive", row.user_id);
                self.sessions.delete(&token_hash).await?;
                return Ok(None);
            }
        };

        let groups = self.users.groups_for(user.id).await?;

        Ok(Some(Session {
            user_id: user.id,
            role: user.role,
            groups,
            issued_at: row.issued_at,
            expires_at: row.expires_at,
            remember_me: row.remember_me,
            token_hash,
        }))
    }

    /// Record the logout, then destroy the session
    pub async fn logout(&self, ctx: &RequestContext, session: &Session) -> Result<(), InternalError> {
        self.activity
            .builder(session.user_id, ActivityAction::UserLogout)
            .with_context(ctx)
            .record()
            .await;

        self.sessions.delete(&session.token_hash).await?;

        tracing::info!("User {} logged out", session.user_id);
        Ok(())
    }

    /// Delete every expired session row
    pub async fn purge_expired(&self) -> Result<u64, InternalError> {
        let purged = self.sessions.delete_expired(Utc::now().timestamp()).await?;
        tracing::info!("Purged {} expired sessions", purged);
        Ok(purged)
    }
}
