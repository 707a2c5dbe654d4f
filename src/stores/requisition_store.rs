use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select,
};

use super::sources::RequisitionSource;
use crate::errors::InternalError;
use crate::types::db::requisition;
use crate::types::internal::pipeline::requisition_status;

/// sea-orm backed [`RequisitionSource`]
pub struct RequisitionStore {
    db: DatabaseConnection,
}

impl RequisitionStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn newest_first(select: Select<requisition::Entity>) -> Select<requisition::Entity> {
        select
            .order_by_desc(requisition::Column::CreatedAt)
            .order_by_desc(requisition::Column::Id)
    }
}

#[async_trait]
impl RequisitionSource for RequisitionStore {
    async fn recent_by_creator(
        &self,
        user_id: i64,
        limit: u64,
    ) -> Result<Vec<requisition::Model>, InternalError> {
        Self::newest_first(
            requisition::Entity::find().filter(requisition::Column::CreatedBy.eq(user_id)),
        )
        .limit(limit)
        .all(&self.db)
        .await
        .map_err(|e| InternalError::database("requisitions_recent_by_creator", e))
    }

    async fn count_by_creator_in(
        &self,
        user_id: i64,
        statuses: &[&str],
    ) -> Result<u64, InternalError> {
        requisition::Entity::find()
            .filter(requisition::Column::CreatedBy.eq(user_id))
            .filter(requisition::Column::Status.is_in(statuses.iter().copied()))
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("requisitions_count_by_creator", e))
    }

    async fn by_status(&self, status: &str) -> Result<Vec<requisition::Model>, InternalError> {
        Self::newest_first(requisition::Entity::find().filter(requisition::Column::Status.eq(status)))
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("requisitions_by_status", e))
    }

    async fn recent_approved_by_chief(
        &self,
        user_id: i64,
        limit: u64,
    ) -> Result<Vec<requisition::Model>, InternalError> {
        Self::newest_first(
            requisition::Entity::find()
                .filter(requisition::Column::Status.eq(requisition_status::CHIEF_APPROVED))
                .filter(requisition::Column::ChiefOfficerApprovedBy.eq(user_id)),
        )
        .limit(limit)
        .all(&self.db)
        .await
        .map_err(|e| InternalError::database("requisitions_approved_by_chief", e))
    }

    async fn recent_by_status(
        &self,
        status: &str,
        limit: u64,
    ) -> Result<Vec<requisition::Model>, InternalError> {
        Self::newest_first(requisition::Entity::find().filter(requisition::Column::Status.eq(status)))
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("requisitions_recent_by_status", e))
    }

    async fn board_approved_since(
        &self,
        since: i64,
    ) -> Result<Vec<requisition::Model>, InternalError> {
        requisition::Entity::find()
            .filter(requisition::Column::Status.eq(requisition_status::BOARD_APPROVED))
            .filter(requisition::Column::BoardApprovedAt.gte(since))
            .order_by_desc(requisition::Column::BoardApprovedAt)
            .order_by_desc(requisition::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("requisitions_board_approved_since", e))
    }

    async fn count_by_status(&self, status: &str) -> Result<u64, InternalError> {
        requisition::Entity::find()
            .filter(requisition::Column::Status.eq(status))
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("requisitions_count_by_status", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::setup_test_db;
    use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, Set};

    async fn insert(
        db: &DatabaseConnection,
        title: &str,
        status: &str,
        created_by: i64,
        created_at: i64,
    ) -> requisition::Model {
        requisition::ActiveModel {
            id: NotSet,
            title: Set(title.to_string()),
            department: Set("Health".to_string()),
            status: Set(status.to_string()),
            created_by: Set(created_by),
            chief_officer_approved_by: Set(None),
            board_approved_at: Set(None),
            created_at: Set(created_at),
        }
        .insert(db)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_recent_by_creator_is_newest_first_and_limited() {
        let db = setup_test_db().await;
        let store = RequisitionStore::new(db.clone());

        insert(&db, "Nurse", requisition_status::PENDING_CHIEF_OFFICER, 1, 100).await;
        insert(&db, "Clerk", requisition_status::PENDING_BOARD, 1, 300).await;
        insert(&db, "Driver", requisition_status::BOARD_APPROVED, 1, 200).await;
        insert(&db, "Other", requisition_status::PENDING_BOARD, 2, 400).await;

        let recent = store.recent_by_creator(1, 2).await.unwrap();
        let titles: Vec<&str> = recent.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["Clerk", "Driver"]);

        let awaiting = store
            .count_by_creator_in(1, &requisition_status::AWAITING_APPROVAL)
            .await
            .unwrap();
        assert_eq!(awaiting, 2);
    }

    #[tokio::test]
    async fn test_chief_approvals_are_scoped_to_officer() {
        let db = setup_test_db().await;
        let store = RequisitionStore::new(db.clone());

        let mine = insert(&db, "Mine", requisition_status::CHIEF_APPROVED, 1, 100).await;
        let theirs = insert(&db, "Theirs", requisition_status::CHIEF_APPROVED, 1, 200).await;
        for (row, officer) in [(mine, 7), (theirs, 8)] {
            let mut active: requisition::ActiveModel = row.into();
            active.chief_officer_approved_by = Set(Some(officer));
            active.update(&db).await.unwrap();
        }

        let approved = store.recent_approved_by_chief(7, 5).await.unwrap();
        assert_eq!(approved.len(), 1);
        assert_eq!(approved[0].title, "Mine");
    }

    #[tokio::test]
    async fn test_board_approved_since_window() {
        let db = setup_test_db().await;
        let store = RequisitionStore::new(db.clone());

        for (title, approved_at) in [("Old", 50), ("Edge", 100), ("New", 150)] {
            let row = insert(&db, title, requisition_status::BOARD_APPROVED, 1, 10).await;
            let mut active: requisition::ActiveModel = row.into();
            active.board_approved_at = Set(Some(approved_at));
            active.update(&db).await.unwrap();
        }

        let recent = store.board_approved_since(100).await.unwrap();
        let titles: Vec<&str> = recent.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["New", "Edge"]);
        assert_eq!(
            store.count_by_status(requisition_status::BOARD_APPROVED).await.unwrap(),
            3
        );
        assert!(store.by_status(requisition_status::PENDING_BOARD).await.unwrap().is_empty());
    }
}
