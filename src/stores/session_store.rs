use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::errors::InternalError;
use crate::types::db::session;

/// Repository for server-side session rows
///
/// Rows are keyed by the HMAC of the bearer token; the token itself never
/// reaches the database.
pub struct SessionStore {
    db: DatabaseConnection,
}

impl SessionStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        token_hash: String,
        user_id: i64,
        issued_at: i64,
        expires_at: i64,
        remember_me: bool,
    ) -> Result<session::Model, InternalError> {
        session::ActiveModel {
            token_hash: Set(token_hash),
            user_id: Set(user_id),
            issued_at: Set(issued_at),
            expires_at: Set(expires_at),
            remember_me: Set(remember_me),
        }
        .insert(&self.db)
        .await
        .map_err(|e| InternalError::database("create_session", e))
    }

    pub async fn find(&self, token_hash: &str) -> Result<Option<session::Model>, InternalError> {
        session::Entity::find_by_id(token_hash.to_string())
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_session", e))
    }

    /// Returns whether a row was deleted
    pub async fn delete(&self, token_hash: &str) -> Result<bool, InternalError> {
        let result = session::Entity::delete_by_id(token_hash.to_string())
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("delete_session", e))?;
        Ok(result.rows_affected > 0)
    }

    /// Remove every session that expired at or before `now`
    pub async fn delete_expired(&self, now: i64) -> Result<u64, InternalError> {
        let result = session::Entity::delete_many()
            .filter(session::Column::ExpiresAt.lte(now))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("delete_expired_sessions", e))?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{insert_test_user, setup_test_db};

    #[tokio::test]
    async fn test_create_find_delete() {
        let db = setup_test_db().await;
        let user = insert_test_user(&db, "session@example.com", "INITIATOR").await;
        let store = SessionStore::new(db);

        store
            .create("hash-1".to_string(), user.id, 100, 200, true)
            .await
            .unwrap();

        let found = store.find("hash-1").await.unwrap().unwrap();
        assert_eq!(found.user_id, user.id);
        assert!(found.remember_me);

        assert!(store.delete("hash-1").await.unwrap());
        assert!(!store.delete("hash-1").await.unwrap());
        assert!(store.find("hash-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_expired_uses_inclusive_boundary() {
        let db = setup_test_db().await;
        let user = insert_test_user(&db, "session@example.com", "INITIATOR").await;
        let store = SessionStore::new(db);

        for (hash, expires_at) in [("past", 99), ("edge", 100), ("future", 101)] {
            store
                .create(hash.to_string(), user.id, 0, expires_at, false)
                .await
                .unwrap();
        }

        assert_eq!(store.delete_expired(100).await.unwrap(), 2);
        assert!(store.find("future").await.unwrap().is_some());
    }
}
