// Common test utilities for integration tests

use std::sync::Mutex;

use migration::{Migrator, MigratorTrait};
use savanna_recruitment_backend::AppData;
use savanna_recruitment_backend::config::{MockEnvironment, SecretManager, SessionLifetimes};
use sea_orm::{Database, DatabaseConnection};

pub const PASSWORD: &str = "Recruit2024!";

/// Creates a test database with migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// AppData wired over a fresh database with fixed test secrets
pub async fn setup_test_app() -> AppData {
    let env = MockEnvironment::empty().with_vars(&[
        ("PASSWORD_PEPPER", "integration-test-pepper"),
        ("SESSION_SECRET", "integration-test-session-secret-0123456789"),
    ]);
    let secrets = SecretManager::init_with_provider(&env).expect("Failed to load test secrets");

    AppData::with_secrets(setup_test_db().await, secrets, SessionLifetimes::default())
}

/// JSON body for the registration endpoint
#[allow(dead_code)]
pub fn registration_body(email: &str, national_id: &str, role: &str) -> serde_json::Value {
    serde_json::json!({
        "email": email,
        "first_name": "Nafula",
        "last_name": "Wekesa",
        "national_id": national_id,
        "phone_number": "+254712345678",
        "role": role,
        "password1": PASSWORD,
        "password2": PASSWORD,
    })
}

/// Helper to manage environment variables in tests
///
/// Cleans up specified environment variables on creation and drop,
/// ensuring test isolation when dealing with global environment state.
#[allow(dead_code)]
pub struct EnvGuard {
    vars: Vec<String>,
}

#[allow(dead_code)]
impl EnvGuard {
    pub fn new(vars: Vec<&str>) -> Self {
        for var in &vars {
            unsafe {
                std::env::remove_var(var);
            }
        }
        Self {
            vars: vars.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for var in &self.vars {
            unsafe {
                std::env::remove_var(var);
            }
        }
    }
}

/// Global mutex for tests that modify environment variables
///
/// Environment variables are process-global, so tests that modify them
/// must run serially to avoid race conditions.
#[allow(dead_code)]
pub static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());
