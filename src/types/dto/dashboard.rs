use poem_openapi::{Object, Union};

use super::accounts::UserSummary;
use crate::types::db::{candidate, requisition};
use crate::types::internal::DashboardSection;

#[derive(Object, Debug)]
pub struct RequisitionSummary {
    pub id: i64,
    pub title: String,
    pub department: String,
    pub status: String,

    /// Unix timestamp
    pub created_at: i64,
}

impl From<requisition::Model> for RequisitionSummary {
    fn from(model: requisition::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            department: model.department,
            status: model.status,
            created_at: model.created_at,
        }
    }
}

#[derive(Object, Debug)]
pub struct CandidateSummary {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub stage: String,

    /// Unix timestamp
    pub applied_date: i64,
}

impl From<candidate::Model> for CandidateSummary {
    fn from(model: candidate::Model) -> Self {
        Self {
            id: model.id,
            full_name: model.full_name,
            email: model.email,
            stage: model.stage,
            applied_date: model.applied_date,
        }
    }
}

#[derive(Object, Debug)]
pub struct InitiatorSection {
    /// Five most recent requisitions raised by the user
    pub my_requisitions: Vec<RequisitionSummary>,

    /// Own requisitions still waiting on an approver
    pub pending_approvals: u64,

    /// Own requisitions the board has approved
    pub approved_requisitions: u64,
}

#[derive(Object, Debug)]
pub struct ChiefOfficerSection {
    pub pending_reviews: Vec<RequisitionSummary>,

    /// Five most recent requisitions this officer approved
    pub recent_approvals: Vec<RequisitionSummary>,
}

#[derive(Object, Debug)]
pub struct CountySecretarySection {
    pub pending_endorsements: Vec<RequisitionSummary>,
    pub recent_endorsements: Vec<RequisitionSummary>,
}

#[derive(Object, Debug)]
pub struct BoardSection {
    pub pending_board_items: Vec<RequisitionSummary>,

    /// Board approvals from the last 30 days
    pub recent_approvals: Vec<RequisitionSummary>,
}

#[derive(Object, Debug)]
pub struct HumanResourcesSection {
    /// Board-approved requisitions
    pub active_requisitions: u64,
    pub total_applications: u64,
    pub shortlisted_count: u64,
    pub interview_count: u64,
    pub recent_candidates: Vec<CandidateSummary>,
}

/// Role-specific dashboard data, tagged by `kind`
#[derive(Union, Debug)]
#[oai(discriminator_name = "kind", one_of)]
pub enum DashboardSectionResponse {
    #[oai(mapping = "initiator")]
    Initiator(InitiatorSection),
    #[oai(mapping = "chief_officer")]
    ChiefOfficer(ChiefOfficerSection),
    #[oai(mapping = "county_secretary")]
    CountySecretary(CountySecretarySection),
    #[oai(mapping = "board")]
    Board(BoardSection),
    #[oai(mapping = "human_resources")]
    HumanResources(HumanResourcesSection),
}

fn summaries(rows: Vec<requisition::Model>) -> Vec<RequisitionSummary> {
    rows.into_iter().map(RequisitionSummary::from).collect()
}

impl From<DashboardSection> for DashboardSectionResponse {
    fn from(section: DashboardSection) -> Self {
        match section {
            DashboardSection::Initiator {
                my_requisitions,
                pending_approvals,
                approved_requisitions,
            } => Self::Initiator(InitiatorSection {
                my_requisitions: summaries(my_requisitions),
                pending_approvals,
                approved_requisitions,
            }),
            DashboardSection::ChiefOfficer {
                pending_reviews,
                recent_approvals,
            } => Self::ChiefOfficer(ChiefOfficerSection {
                pending_reviews: summaries(pending_reviews),
                recent_approvals: summaries(recent_approvals),
            }),
            DashboardSection::CountySecretary {
                pending_endorsements,
                recent_endorsements,
            } => Self::CountySecretary(CountySecretarySection {
                pending_endorsements: summaries(pending_endorsements),
                recent_endorsements: summaries(recent_endorsements),
            }),
            DashboardSection::Board {
                pending_board_items,
                recent_approvals,
            } => Self::Board(BoardSection {
                pending_board_items: summaries(pending_board_items),
                recent_approvals: summaries(recent_approvals),
            }),
            DashboardSection::HumanResources {
                active_requisitions,
                total_applications,
                shortlisted_count,
                interview_count,
                recent_candidates,
            } => Self::HumanResources(HumanResourcesSection {
                active_requisitions,
                total_applications,
                shortlisted_count,
                interview_count,
                recent_candidates: recent_candidates
                    .into_iter()
                    .map(CandidateSummary::from)
                    .collect(),
            }),
        }
    }
}

/// Landing page
#[derive(Object, Debug)]
pub struct DashboardResponse {
    pub user: UserSummary,

    /// Server time (ISO 8601 format)
    pub today: String,

    /// Absent for roles without a dedicated section
    pub section: Option<DashboardSectionResponse>,
}
