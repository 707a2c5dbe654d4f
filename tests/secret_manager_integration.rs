mod common;

use std::sync::Arc;

use savanna_recruitment_backend::AppData;
use savanna_recruitment_backend::config::{SecretError, SecretManager, SessionLifetimes};
use savanna_recruitment_backend::errors::InternalError;
use savanna_recruitment_backend::services::CryptoService;

const SECRET_VARS: [&str; 2] = ["PASSWORD_PEPPER", "SESSION_SECRET"];

#[test]
fn test_application_startup_with_valid_secrets() {
    let _lock = common::ENV_TEST_MUTEX.lock().unwrap();
    let _guard = common::EnvGuard::new(SECRET_VARS.to_vec());

    unsafe {
        std::env::set_var("PASSWORD_PEPPER", "valid-pepper-16ch");
        std::env::set_var("SESSION_SECRET", "this-is-a-valid-session-secret-with-32ch");
    }

    let secret_manager = Arc::new(SecretManager::init().expect("secrets should load"));
    assert_eq!(secret_manager.password_pepper(), "valid-pepper-16ch");
    assert_eq!(
        secret_manager.session_secret(),
        "this-is-a-valid-session-secret-with-32ch"
    );

    // Secrets feed the crypto service end to end
    let crypto = CryptoService::new(
        secret_manager.password_pepper(),
        secret_manager.session_secret(),
    );
    let hash = crypto.hash_password("Recruit2024!").unwrap();
    assert!(crypto.verify_password(&hash, "Recruit2024!").unwrap());
}

#[test]
fn test_application_fails_gracefully_with_missing_session_secret() {
    let _lock = common::ENV_TEST_MUTEX.lock().unwrap();
    let _guard = common::EnvGuard::new(SECRET_VARS.to_vec());

    unsafe {
        std::env::set_var("PASSWORD_PEPPER", "valid-pepper-16ch");
    }

    let err = SecretManager::init().unwrap_err();
    assert_eq!(err.to_string(), "Required secret 'SESSION_SECRET' is missing");
    assert_eq!(err, SecretError::missing("SESSION_SECRET"));
}

#[test]
fn test_application_fails_gracefully_with_short_pepper() {
    let _lock = common::ENV_TEST_MUTEX.lock().unwrap();
    let _guard = common::EnvGuard::new(SECRET_VARS.to_vec());

    unsafe {
        std::env::set_var("PASSWORD_PEPPER", "short");
        std::env::set_var("SESSION_SECRET", "this-is-a-valid-session-secret-with-32ch");
    }

    match SecretManager::init().unwrap_err() {
        SecretError::InvalidLength {
            secret_name,
            expected,
            actual,
        } => {
            assert_eq!(secret_name, "PASSWORD_PEPPER");
            assert_eq!(expected, 16);
            assert_eq!(actual, 5);
        }
        other => panic!("Expected InvalidLength, got {:?}", other),
    }
}

#[tokio::test]
async fn test_app_data_init_reports_missing_secrets() {
    let db = common::setup_test_db().await;
    let _lock = common::ENV_TEST_MUTEX.lock().unwrap();
    let _guard = common::EnvGuard::new(SECRET_VARS.to_vec());

    match AppData::init(db, SessionLifetimes::default()).await {
        Err(InternalError::Parse { value_type, message }) => {
            assert_eq!(value_type, "secret_manager");
            assert!(message.contains("PASSWORD_PEPPER"));
        }
        Err(other) => panic!("Expected secret_manager parse error, got {:?}", other),
        Ok(_) => panic!("AppData::init should fail without secrets"),
    }
}
