use crate::types::db::{candidate, requisition, user};

/// Landing-page data for one user
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub user: user::Model,
    /// Server time the dashboard was assembled, Unix seconds
    pub today: i64,
    /// `None` for roles without a dedicated section
    pub section: Option<DashboardSection>,
}

/// Role-specific part of the dashboard
///
/// One variant per branch so a branch cannot carry another's data.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardSection {
    Initiator {
        my_requisitions: Vec<requisition::Model>,
        pending_approvals: u64,
        approved_requisitions: u64,
    },
    ChiefOfficer {
        pending_reviews: Vec<requisition::Model>,
        recent_approvals: Vec<requisition::Model>,
    },
    CountySecretary {
        pending_endorsements: Vec<requisition::Model>,
        recent_endorsements: Vec<requisition::Model>,
    },
    Board {
        pending_board_items: Vec<requisition::Model>,
        recent_approvals: Vec<requisition::Model>,
    },
    HumanResources {
        active_requisitions: u64,
        total_applications: u64,
        shortlisted_count: u64,
        interview_count: u64,
        recent_candidates: Vec<candidate::Model>,
    },
}

impl DashboardSection {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Initiator { .. } => "initiator",
            Self::ChiefOfficer { .. } => "chief_officer",
            Self::CountySecretary { .. } => "county_secretary",
            Self::Board { .. } => "board",
            Self::HumanResources { .. } => "human_resources",
        }
    }
}
