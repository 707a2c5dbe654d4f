use chrono::{Datelike, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
    sea_query::OnConflict,
};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::errors::internal::account::{DUPLICATE_EMAIL, DUPLICATE_NATIONAL_ID};
use crate::errors::internal::database::unique_violation_detail;
use crate::errors::internal::{AccountError, DatabaseError};
use crate::services::crypto::generate_employee_id;
use crate::types::db::{user, user_group};

/// Attempts at finding a free employee number before giving up
const EMPLOYEE_ID_ATTEMPTS: usize = 5;

/// Everything needed to insert a user row, already validated and hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub national_id: String,
    pub phone_number: String,
    pub role: String,
    pub department: String,
    pub group_name: String,
    pub created_by: Option<i64>,
}

/// Profile fields a user may change on their own account
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    /// `Some(None)` clears the picture
    pub profile_picture: Option<Option<String>>,
}

/// Which unique column a rejected insert collided on
enum UniqueCollision {
    Email,
    NationalId,
    EmployeeId,
    Other(DbErr),
}

impl UniqueCollision {
    fn classify(err: DbErr) -> Self {
        match unique_violation_detail(&err) {
            Some(detail) if detail.contains("users.email") => Self::Email,
            Some(detail) if detail.contains("users.national_id") => Self::NationalId,
            Some(detail) if detail.contains("users.employee_id") => Self::EmployeeId,
            _ => Self::Other(err),
        }
    }
}

/// Repository for user accounts and their group memberships
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool, InternalError> {
        let count = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("email_exists", e))?;
        Ok(count > 0)
    }

    pub async fn national_id_exists(&self, national_id: &str) -> Result<bool, InternalError> {
        let count = user::Entity::find()
            .filter(user::Column::NationalId.eq(national_id))
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("national_id_exists", e))?;
        Ok(count > 0)
    }

    /// Insert a user together with their initial group membership
    ///
    /// The employee number is generated here. A collision on it is retried
    /// with a fresh number; collisions on email or national ID (a concurrent
    /// registration that won the race) become field-level validation errors.
    pub async fn insert(&self, new_user: NewUser) -> Result<user::Model, InternalError> {
        for attempt in 1..=EMPLOYEE_ID_ATTEMPTS {
            let employee_id = generate_employee_id(Utc::now().year());
            match self.try_insert(&new_user, employee_id).await {
                Ok(model) => return Ok(model),
                Err(InsertFailure::Collision(UniqueCollision::EmployeeId)) => {
                    tracing::debug!("Employee ID collision on attempt {}, retrying", attempt);
                }
                Err(InsertFailure::Collision(UniqueCollision::Email)) => {
                    return Err(AccountError::validation("email", DUPLICATE_EMAIL));
                }
                Err(InsertFailure::Collision(UniqueCollision::NationalId)) => {
                    return Err(AccountError::validation("national_id", DUPLICATE_NATIONAL_ID));
                }
                Err(InsertFailure::Collision(UniqueCollision::Other(e))) => {
                    return Err(InternalError::database("insert_user", e));
                }
                Err(InsertFailure::Internal(e)) => return Err(e),
            }
        }

        tracing::error!("Could not allocate a unique employee ID");
        Err(InternalError::database(
            "insert_user",
            DbErr::Custom(format!(
                "employee_id collided {} times",
                EMPLOYEE_ID_ATTEMPTS
            )),
        ))
    }

    async fn try_insert(
        &self,
        new_user: &NewUser,
        employee_id: String,
    ) -> Result<user::Model, InsertFailure> {
        let now = Utc::now().timestamp();

        let txn = self.db.begin().await.map_err(|e| {
            InsertFailure::Internal(InternalError::Database(DatabaseError::TransactionBegin {
                source: e,
            }))
        })?;

        let model = user::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            uuid: Set(Uuid::new_v4().to_string()),
            email: Set(new_user.email.clone()),
            password_hash: Set(new_user.password_hash.clone()),
            first_name: Set(new_user.first_name.clone()),
            last_name: Set(new_user.last_name.clone()),
            national_id: Set(new_user.national_id.clone()),
            phone_number: Set(new_user.phone_number.clone()),
            profile_picture: Set(None),
            role: Set(new_user.role.clone()),
            department: Set(new_user.department.clone()),
            employee_id: Set(Some(employee_id)),
            is_active: Set(true),
            date_joined: Set(now),
            last_activity: Set(now),
            created_by: Set(new_user.created_by),
        }
        .insert(&txn)
        .await
        .map_err(|e| InsertFailure::Collision(UniqueCollision::classify(e)))?;

        user_group::ActiveModel {
            user_id: Set(model.id),
            group_name: Set(new_user.group_name.clone()),
            added_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| InsertFailure::Internal(InternalError::database("insert_user_group", e)))?;

        txn.commit().await.map_err(|e| {
            InsertFailure::Internal(InternalError::Database(DatabaseError::TransactionCommit {
                source: e,
            }))
        })?;

        Ok(model)
    }

    pub async fn find_by_id(&self, user_id: i64) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_user_by_id", e))
    }

    /// Lookup by an already-normalized email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_user_by_email", e))
    }

    async fn get(&self, user_id: i64) -> Result<user::Model, InternalError> {
        self.find_by_id(user_id)
            .await?
            .ok_or_else(|| AccountError::user_not_found(user_id))
    }

    pub async fn update_profile(
        &self,
        user_id: i64,
        changes: ProfileChanges,
    ) -> Result<user::Model, InternalError> {
        let mut active = self.get(user_id).await?.into_active_model();

        if let Some(first_name) = changes.first_name {
            active.first_name = Set(first_name);
        }
        if let Some(last_name) = changes.last_name {
            active.last_name = Set(last_name);
        }
        if let Some(phone_number) = changes.phone_number {
            active.phone_number = Set(phone_number);
        }
        if let Some(profile_picture) = changes.profile_picture {
            active.profile_picture = Set(profile_picture);
        }
        active.last_activity = Set(Utc::now().timestamp());

        active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("update_profile", e))
    }

    pub async fn set_active(&self, user_id: i64, is_active: bool) -> Result<user::Model, InternalError> {
        let mut active = self.get(user_id).await?.into_active_model();
        active.is_active = Set(is_active);
        active.last_activity = Set(Utc::now().timestamp());

        active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("set_active", e))
    }

    pub async fn assign(
        &self,
        user_id: i64,
        role: Option<String>,
        department: Option<String>,
    ) -> Result<user::Model, InternalError> {
        let mut active = self.get(user_id).await?.into_active_model();
        if let Some(role) = role {
            active.role = Set(role);
        }
        if let Some(department) = department {
            active.department = Set(department);
        }
        active.last_activity = Set(Utc::now().timestamp());

        active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("assign_user", e))
    }

    /// Bump `last_activity` without changing anything else
    pub async fn touch(&self, user_id: i64) -> Result<(), InternalError> {
        user::Entity::update_many()
            .col_expr(
                user::Column::LastActivity,
                sea_orm::sea_query::Expr::value(Utc::now().timestamp()),
            )
            .filter(user::Column::Id.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("touch_user", e))?;
        Ok(())
    }

    /// Users newest-joined first, optionally narrowed by exact role and a
    /// case-insensitive substring over name, email and national ID
    pub async fn search(
        &self,
        role: Option<&str>,
        query: Option<&str>,
    ) -> Result<Vec<user::Model>, InternalError> {
        let mut select = user::Entity::find();

        if let Some(role) = role.filter(|r| !r.is_empty()) {
            select = select.filter(user::Column::Role.eq(role));
        }

        if let Some(query) = query.map(str::trim).filter(|q| !q.is_empty()) {
            // SQLite LIKE is case-insensitive for ASCII
            select = select.filter(
                Condition::any()
                    .add(user::Column::FirstName.contains(query))
                    .add(user::Column::LastName.contains(query))
                    .add(user::Column::Email.contains(query))
                    .add(user::Column::NationalId.contains(query)),
            );
        }

        select
            .order_by_desc(user::Column::DateJoined)
            .order_by_desc(user::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("search_users", e))
    }

    pub async fn groups_for(&self, user_id: i64) -> Result<Vec<String>, InternalError> {
        let rows = user_group::Entity::find()
            .filter(user_group::Column::UserId.eq(user_id))
            .order_by_asc(user_group::Column::GroupName)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("groups_for_user", e))?;
        Ok(rows.into_iter().map(|row| row.group_name).collect())
    }

    /// Idempotent; adding an existing membership is a no-op
    pub async fn add_group(&self, user_id: i64, group_name: &str) -> Result<(), InternalError> {
        self.get(user_id).await?;

        user_group::Entity::insert(user_group::ActiveModel {
            user_id: Set(user_id),
            group_name: Set(group_name.to_string()),
            added_at: Set(Utc::now().timestamp()),
        })
        .on_conflict(
            OnConflict::columns([user_group::Column::UserId, user_group::Column::GroupName])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&self.db)
        .await
        .map_err(|e| InternalError::database("add_user_group", e))?;
        Ok(())
    }

    /// Returns whether a membership was actually removed
    pub async fn remove_group(&self, user_id: i64, group_name: &str) -> Result<bool, InternalError> {
        self.get(user_id).await?;

        let result = user_group::Entity::delete_many()
            .filter(user_group::Column::UserId.eq(user_id))
            .filter(user_group::Column::GroupName.eq(group_name))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("remove_user_group", e))?;
        Ok(result.rows_affected > 0)
    }
}

enum InsertFailure {
    Collision(UniqueCollision),
    Internal(InternalError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::setup_test_db;

    fn new_user(email: &str, national_id: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password_hash: "$argon2id$placeholder".to_string(),
            first_name: "Amina".to_string(),
            last_name: "Otieno".to_string(),
            national_id: national_id.to_string(),
            phone_number: "0712345678".to_string(),
            role: "INITIATOR".to_string(),
            department: "Health".to_string(),
            group_name: "Initiators".to_string(),
            created_by: None,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_employee_id_and_group() {
        let store = UserStore::new(setup_test_db().await);

        let user = store.insert(new_user("amina@savanna.go.ke", "1234567")).await.unwrap();

        let employee_id = user.employee_id.clone().unwrap();
        assert!(employee_id.starts_with("SAV"));
        assert_eq!(employee_id.len(), 11);
        assert!(user.is_active);
        assert_eq!(store.groups_for(user.id).await.unwrap(), vec!["Initiators".to_string()]);
    }

    #[tokio::test]
    async fn test_race_loser_gets_field_errors() {
        let store = UserStore::new(setup_test_db().await);
        store.insert(new_user("amina@savanna.go.ke", "1234567")).await.unwrap();

        match store.insert(new_user("amina@savanna.go.ke", "7654321")).await {
            Err(InternalError::Account(AccountError::Validation(errors))) => {
                assert!(errors.has_field("email"));
            }
            other => panic!("Expected email validation error, got {:?}", other),
        }

        match store.insert(new_user("other@savanna.go.ke", "1234567")).await {
            Err(InternalError::Account(AccountError::Validation(errors))) => {
                assert!(errors.has_field("national_id"));
            }
            other => panic!("Expected national_id validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_group_membership_is_independent() {
        let store = UserStore::new(setup_test_db().await);
        let user = store.insert(new_user("amina@savanna.go.ke", "1234567")).await.unwrap();

        store.add_group(user.id, "Panelists").await.unwrap();
        store.add_group(user.id, "Panelists").await.unwrap();
        assert_eq!(
            store.groups_for(user.id).await.unwrap(),
            vec!["Initiators".to_string(), "Panelists".to_string()]
        );

        assert!(store.remove_group(user.id, "Initiators").await.unwrap());
        assert!(!store.remove_group(user.id, "Initiators").await.unwrap());
        assert_eq!(store.groups_for(user.id).await.unwrap(), vec!["Panelists".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_user_is_not_found() {
        let store = UserStore::new(setup_test_db().await);

        match store.set_active(404, false).await {
            Err(InternalError::Account(AccountError::UserNotFound { user_id: 404 })) => {}
            other => panic!("Expected UserNotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_search_is_newest_first_and_repeatable() {
        let store = UserStore::new(setup_test_db().await);
        let first = store.insert(new_user("amina@savanna.go.ke", "1234567")).await.unwrap();
        let mut panelist = new_user("baraka@savanna.go.ke", "7654321");
        panelist.role = "PANELIST".to_string();
        panelist.last_name = "Mwangi".to_string();
        let second = store.insert(panelist).await.unwrap();

        let ids = |users: Vec<user::Model>| users.into_iter().map(|u| u.id).collect::<Vec<_>>();

        let once = ids(store.search(None, None).await.unwrap());
        let twice = ids(store.search(None, None).await.unwrap());
        assert_eq!(once, vec![second.id, first.id]);
        assert_eq!(once, twice);

        assert_eq!(ids(store.search(Some("PANELIST"), None).await.unwrap()), vec![second.id]);
        assert_eq!(ids(store.search(None, Some("mwangi")).await.unwrap()), vec![second.id]);
        assert_eq!(ids(store.search(None, Some("1234567")).await.unwrap()), vec![first.id]);
        assert_eq!(ids(store.search(Some(""), Some("  ")).await.unwrap()).len(), 2);
    }
}
