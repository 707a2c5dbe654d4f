use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::errors::InternalError;
use crate::errors::internal::AuditError;
use crate::types::db::activity_log;
use crate::types::internal::ActivityEntry;

/// Repository for the append-only user activity log
pub struct ActivityStore {
    db: DatabaseConnection,
}

impl ActivityStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Append an entry; the timestamp is assigned here
    ///
    /// Timestamps are Unix microseconds and strictly increase per user, so a
    /// new entry always sorts after the one written before it.
    pub async fn append(&self, entry: ActivityEntry) -> Result<activity_log::Model, InternalError> {
        let data_json = serde_json::to_string(&entry.data).map_err(|e| {
            AuditError::LogWriteFailed(format!("Failed to serialize activity data: {}", e))
        })?;

        let timestamp = self.next_timestamp(entry.user_id).await?;

        activity_log::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            user_id: Set(entry.user_id),
            action: Set(entry.action.to_string()),
            ip_address: Set(entry.ip_address),
            user_agent: Set(entry.user_agent),
            timestamp: Set(timestamp),
            data: Set(data_json),
        }
        .insert(&self.db)
        .await
        .map_err(|e| InternalError::database("append_activity", e))
    }

    async fn next_timestamp(&self, user_id: i64) -> Result<i64, InternalError> {
        let now = Utc::now().timestamp_micros();
        let latest = activity_log::Entity::find()
            .filter(activity_log::Column::UserId.eq(user_id))
            .order_by_desc(activity_log::Column::Timestamp)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("latest_activity_timestamp", e))?;

        Ok(match latest {
            Some(row) if row.timestamp >= now => row.timestamp + 1,
            _ => now,
        })
    }

    /// Newest first; equal timestamps fall back to insertion order
    pub async fn list_for_user(
        &self,
        user_id: i64,
        limit: u64,
    ) -> Result<Vec<activity_log::Model>, InternalError> {
        activity_log::Entity::find()
            .filter(activity_log::Column::UserId.eq(user_id))
            .order_by_desc(activity_log::Column::Timestamp)
            .order_by_desc(activity_log::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_activity_for_user", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{insert_test_user, setup_test_db};
    use crate::types::internal::ActivityAction;

    #[tokio::test]
    async fn test_back_to_back_entries_have_increasing_timestamps() {
        let db = setup_test_db().await;
        let user = insert_test_user(&db, "clerk@savanna.go.ke", "INITIATOR").await;
        let store = ActivityStore::new(db);

        for _ in 0..3 {
            store
                .append(ActivityEntry::new(user.id, ActivityAction::UserLogin))
                .await
                .unwrap();
        }

        let entries = store.list_for_user(user.id, 10).await.unwrap();
        assert_eq!(entries.len(), 3);
        assert!(entries[0].timestamp > entries[1].timestamp);
        assert!(entries[1].timestamp > entries[2].timestamp);
        assert!(entries[0].id > entries[1].id);
    }

    #[tokio::test]
    async fn test_timestamps_are_microseconds() {
        let db = setup_test_db().await;
        let user = insert_test_user(&db, "micro@savanna.go.ke", "INITIATOR").await;
        let store = ActivityStore::new(db);

        let before = Utc::now().timestamp_micros();
        let row = store
            .append(ActivityEntry::new(user.id, ActivityAction::UserLogin))
            .await
            .unwrap();

        assert!(row.timestamp >= before);
        assert!(row.timestamp <= Utc::now().timestamp_micros() + 1);
    }
}
