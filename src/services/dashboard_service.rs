use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::errors::InternalError;
use crate::stores::{CandidateSource, RequisitionSource};
use crate::types::db::user;
use crate::types::internal::pipeline::{candidate_stage, requisition_status};
use crate::types::internal::{Dashboard, DashboardSection, Role};

const RECENT_LIMIT: u64 = 5;
const BOARD_LOOKBACK_DAYS: i64 = 30;

/// Read-only aggregator behind the landing page
///
/// Each role branch issues its own queries against the requisition and
/// candidate sources. Nothing here writes.
pub struct DashboardService {
    requisitions: Arc<dyn RequisitionSource>,
    candidates: Arc<dyn CandidateSource>,
}

impl DashboardService {
    pub fn new(
        requisitions: Arc<dyn RequisitionSource>,
        candidates: Arc<dyn CandidateSource>,
    ) -> Self {
        Self {
            requisitions,
            candidates,
        }
    }

    /// Assemble the dashboard for `user`
    ///
    /// A role string outside the known set gets the base context only.
    pub async fn build(&self, user: &user::Model) -> Result<Dashboard, InternalError> {
        let section = match user.role.parse::<Role>() {
            Ok(role) => self.section_for(role, user.id).await?,
            Err(_) => {
                tracing::debug!("No dashboard section for role {}", user.role);
                None
            }
        };

        Ok(Dashboard {
            user: user.clone(),
            today: Utc::now().timestamp(),
            section,
        })
    }

    async fn section_for(
        &self,
        role: Role,
        user_id: i64,
    ) -> Result<Option<DashboardSection>, InternalError> {
        let section = match role {
            Role::Initiator => Some(DashboardSection::Initiator {
                my_requisitions: self
                    .requisitions
                    .recent_by_creator(user_id, RECENT_LIMIT)
                    .await?,
                pending_approvals: self
                    .requisitions
                    .count_by_creator_in(user_id, &requisition_status::AWAITING_APPROVAL)
                    .await?,
                approved_requisitions: self
                    .requisitions
                    .count_by_creator_in(user_id, &[requisition_status::BOARD_APPROVED])
                    .await?,
            }),
            Role::ChiefOfficer => Some(DashboardSection::ChiefOfficer {
                pending_reviews: self
                    .requisitions
                    .by_status(requisition_status::PENDING_CHIEF_OFFICER)
                    .await?,
                recent_approvals: self
                    .requisitions
                    .recent_approved_by_chief(user_id, RECENT_LIMIT)
                    .await?,
            }),
            Role::CountySecretary => Some(DashboardSection::CountySecretary {
                pending_endorsements: self
                    .requisitions
                    .by_status(requisition_status::PENDING_COUNTY_SECRETARY)
                    .await?,
                recent_endorsements: self
                    .requisitions
                    .recent_by_status(requisition_status::COUNTY_SECRETARY_ENDORSED, RECENT_LIMIT)
                    .await?,
            }),
            Role::CpsbBoard => {
                let since = (Utc::now() - Duration::days(BOARD_LOOKBACK_DAYS)).timestamp();
                Some(DashboardSection::Board {
                    pending_board_items: self
                        .requisitions
                        .by_status(requisition_status::PENDING_BOARD)
                        .await?,
                    recent_approvals: self.requisitions.board_approved_since(since).await?,
                })
            }
            Role::HrSecretariat | Role::HrAdmin => Some(DashboardSection::HumanResources {
                active_requisitions: self
                    .requisitions
                    .count_by_status(requisition_status::BOARD_APPROVED)
                    .await?,
                total_applications: self.candidates.count_all().await?,
                shortlisted_count: self
                    .candidates
                    .count_by_stage(candidate_stage::SHORTLISTED)
                    .await?,
                interview_count: self
                    .candidates
                    .count_by_stage(candidate_stage::INTERVIEWED)
                    .await?,
                recent_candidates: self.candidates.recent_applied(RECENT_LIMIT).await?,
            }),
            Role::CpsbSecretariat | Role::Panelist | Role::PayrollOfficer => None,
        };
        Ok(section)
    }
}
