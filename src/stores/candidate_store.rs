use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use super::sources::CandidateSource;
use crate::errors::InternalError;
use crate::types::db::candidate;

/// sea-orm backed [`CandidateSource`]
pub struct CandidateStore {
    db: DatabaseConnection,
}

impl CandidateStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CandidateSource for CandidateStore {
    async fn count_all(&self) -> Result<u64, InternalError> {
        candidate::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("candidates_count_all", e))
    }

    async fn count_by_stage(&self, stage: &str) -> Result<u64, InternalError> {
        candidate::Entity::find()
            .filter(candidate::Column::Stage.eq(stage))
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("candidates_count_by_stage", e))
    }

    async fn recent_applied(&self, limit: u64) -> Result<Vec<candidate::Model>, InternalError> {
        candidate::Entity::find()
            .order_by_desc(candidate::Column::AppliedDate)
            .order_by_desc(candidate::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("candidates_recent_applied", e))
    }
}
