use async_trait::async_trait;

use crate::errors::InternalError;
use crate::types::db::{candidate, requisition};

/// Read access to the requisition pipeline's records
#[async_trait]
pub trait RequisitionSource: Send + Sync {
    /// A creator's requisitions, newest first
    async fn recent_by_creator(
        &self,
        user_id: i64,
        limit: u64,
    ) -> Result<Vec<requisition::Model>, InternalError>;

    async fn count_by_creator_in(
        &self,
        user_id: i64,
        statuses: &[&str],
    ) -> Result<u64, InternalError>;

    async fn by_status(&self, status: &str) -> Result<Vec<requisition::Model>, InternalError>;

    /// Chief-approved requisitions signed off by this officer, newest first
    async fn recent_approved_by_chief(
        &self,
        user_id: i64,
        limit: u64,
    ) -> Result<Vec<requisition::Model>, InternalError>;

    async fn recent_by_status(
        &self,
        status: &str,
        limit: u64,
    ) -> Result<Vec<requisition::Model>, InternalError>;

    /// Board-approved requisitions whose approval is at or after `since`
    async fn board_approved_since(
        &self,
        since: i64,
    ) -> Result<Vec<requisition::Model>, InternalError>;

    async fn count_by_status(&self, status: &str) -> Result<u64, InternalError>;
}

/// Read access to the candidate pipeline's records
#[async_trait]
pub trait CandidateSource: Send + Sync {
    async fn count_all(&self) -> Result<u64, InternalError>;

    async fn count_by_stage(&self, stage: &str) -> Result<u64, InternalError>;

    /// Most recent applications first
    async fn recent_applied(&self, limit: u64) -> Result<Vec<candidate::Model>, InternalError>;
}
