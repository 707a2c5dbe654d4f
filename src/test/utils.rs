// Test utilities shared by unit tests
// Only compiled when running tests

use std::sync::atomic::{AtomicU64, Ordering};

use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use crate::app_data::AppData;
use crate::config::{MockEnvironment, SecretManager, SessionLifetimes};
use crate::stores::{NewUser, UserStore};
use crate::types::db::user;
use crate::types::internal::Group;

static NEXT_NATIONAL_ID: AtomicU64 = AtomicU64::new(3_000_000);

/// In-memory SQLite database with every migration applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

pub fn test_secret_manager() -> SecretManager {
    let env = MockEnvironment::empty().with_vars(&[
        ("PASSWORD_PEPPER", "test-pepper-for-unit-tests"),
        ("SESSION_SECRET", "test-session-secret-minimum-32-characters"),
    ]);
    SecretManager::init_with_provider(&env).expect("Failed to load test secrets")
}

/// Fully wired AppData over a fresh in-memory database
pub async fn setup_test_app() -> AppData {
    AppData::with_secrets(
        setup_test_db().await,
        test_secret_manager(),
        SessionLifetimes::default(),
    )
}

/// Insert a user straight through the store, bypassing validation and hashing
pub async fn insert_test_user(db: &DatabaseConnection, email: &str, role: &str) -> user::Model {
    let national_id = NEXT_NATIONAL_ID.fetch_add(1, Ordering::Relaxed).to_string();

    UserStore::new(db.clone())
        .insert(NewUser {
            email: email.to_string(),
            password_hash: "$argon2id$not-a-real-hash".to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            national_id,
            phone_number: "0712345678".to_string(),
            role: role.to_string(),
            department: "Health".to_string(),
            group_name: Group::for_role_name(role).name().to_string(),
            created_by: None,
        })
        .await
        .expect("Failed to insert test user")
}
