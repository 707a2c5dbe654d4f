use std::sync::Arc;

use chrono::{TimeZone, Utc};
use poem::Request;
use poem_openapi::{OpenApi, Tags, payload::Json};

use crate::api::helpers;
use crate::errors::DashboardError;
use crate::services::activity_logger::decode_payload;
use crate::services::{AccountService, ActivityLogger, AuthService, DashboardService, guard};
use crate::types::dto::accounts::UserSummary;
use crate::types::dto::activity::{ActivityEntryResponse, ActivityLogResponse};
use crate::types::dto::dashboard::{DashboardResponse, DashboardSectionResponse};
use crate::types::internal::Session;

/// Entries returned by the activity log page
const ACTIVITY_PAGE_SIZE: u64 = 50;

/// Landing page and personal activity log
pub struct DashboardApi {
    accounts: Arc<AccountService>,
    auth: Arc<AuthService>,
    dashboard: Arc<DashboardService>,
    activity: Arc<ActivityLogger>,
}

impl DashboardApi {
    pub fn new(
        accounts: Arc<AccountService>,
        auth: Arc<AuthService>,
        dashboard: Arc<DashboardService>,
        activity: Arc<ActivityLogger>,
    ) -> Self {
        Self {
            accounts,
            auth,
            dashboard,
            activity,
        }
    }

    async fn require_authenticated(&self, req: &Request) -> Result<Session, DashboardError> {
        let session = helpers::current_session(&self.auth, req)
            .await
            .map_err(DashboardError::from_internal_error)?;

        guard::require_authenticated(session)
            .into_result()
            .map_err(|_| DashboardError::login_required())
    }
}

/// API tags for dashboard endpoints
#[derive(Tags)]
enum DashboardTags {
    /// Role-specific landing page
    Dashboard,
    /// Personal activity history
    Activity,
}

#[OpenApi]
impl DashboardApi {
    /// Role-specific summary for the caller
    #[oai(path = "/dashboard", method = "get", tag = "DashboardTags::Dashboard")]
    async fn dashboard(&self, req: &Request) -> Result<Json<DashboardResponse>, DashboardError> {
        let session = self.require_authenticated(req).await?;

        let user = self
            .accounts
            .get_by_id(session.user_id)
            .await
            .map_err(DashboardError::from_internal_error)?;
        let dashboard = self
            .dashboard
            .build(&user)
            .await
            .map_err(DashboardError::from_internal_error)?;

        let today = Utc
            .timestamp_opt(dashboard.today, 0)
            .single()
            .unwrap_or_else(Utc::now)
            .to_rfc3339();

        Ok(Json(DashboardResponse {
            user: UserSummary::from(dashboard.user),
            today,
            section: dashboard.section.map(DashboardSectionResponse::from),
        }))
    }

    /// The caller's 50 most recent activity entries, newest first
    #[oai(path = "/activity-log", method = "get", tag = "DashboardTags::Activity")]
    async fn activity_log(&self, req: &Request) -> Result<Json<ActivityLogResponse>, DashboardError> {
        let session = self.require_authenticated(req).await?;

        let rows = self
            .activity
            .list_for_user(session.user_id, ACTIVITY_PAGE_SIZE)
            .await
            .map_err(DashboardError::from_internal_error)?;

        let entries = rows
            .into_iter()
            .map(|row| {
                let data = match decode_payload(&row) {
                    Ok(map) => serde_json::Value::Object(map),
                    Err(e) => {
                        tracing::warn!("{}", e);
                        serde_json::Value::Null
                    }
                };
                ActivityEntryResponse {
                    id: row.id,
                    action: row.action,
                    ip_address: row.ip_address,
                    user_agent: row.user_agent,
                    timestamp: row.timestamp,
                    data,
                }
            })
            .collect();

        Ok(Json(ActivityLogResponse { entries }))
    }
}
