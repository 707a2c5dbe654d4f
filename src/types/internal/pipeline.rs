//! Status and stage codes owned by the requisition and candidate pipelines.
//! Only the values the dashboard reads are listed.

pub mod requisition_status {
    pub const PENDING_CHIEF_OFFICER: &str = "PENDING_CHIEF_OFFICER";
    pub const CHIEF_APPROVED: &str = "CHIEF_APPROVED";
    pub const PENDING_COUNTY_SECRETARY: &str = "PENDING_COUNTY_SECRETARY";
    pub const COUNTY_SECRETARY_ENDORSED: &str = "COUNTY_SECRETARY_ENDORSED";
    pub const PENDING_BOARD: &str = "PENDING_BOARD";
    pub const BOARD_APPROVED: &str = "BOARD_APPROVED";

    /// Statuses an initiator sees as "waiting on someone else"
    pub const AWAITING_APPROVAL: [&str; 3] =
        [PENDING_CHIEF_OFFICER, PENDING_COUNTY_SECRETARY, PENDING_BOARD];
}

pub mod candidate_stage {
    pub const APPLIED: &str = "APPLIED";
    pub const SHORTLISTED: &str = "SHORTLISTED";
    pub const INTERVIEWED: &str = "INTERVIEWED";
}
