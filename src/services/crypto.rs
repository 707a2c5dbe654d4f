use std::sync::OnceLock;

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use base64::{Engine as _, engine::general_purpose};
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;

use crate::errors::InternalError;
use crate::types::internal::SessionToken;

type HmacSha256 = Hmac<Sha256>;

/// Password hashing and session-token primitives
///
/// Passwords are hashed with Argon2id using the application pepper as the
/// Argon2 secret parameter. Session tokens are random bytes; only their
/// HMAC-SHA256 (keyed by the session secret) is ever persisted.
pub struct CryptoService {
    password_pepper: String,
    session_secret: String,
    dummy_hash: OnceLock<String>,
}

impl CryptoService {
    pub fn new(password_pepper: impl Into<String>, session_secret: impl Into<String>) -> Self {
        Self {
            password_pepper: password_pepper.into(),
            session_secret: session_secret.into(),
            dummy_hash: OnceLock::new(),
        }
    }

    fn argon2(&self) -> Result<Argon2<'_>, InternalError> {
        Argon2::new_with_secret(
            self.password_pepper.as_bytes(),
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        )
        .map_err(|e| InternalError::crypto("argon2_init", e.to_string()))
    }

    /// Hash a plaintext password into a PHC string
    pub fn hash_password(&self, password: &str) -> Result<String, InternalError> {
        let salt = SaltString::generate(&mut rand_core::OsRng);
        let hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| InternalError::crypto("hash_password", e.to_string()))?
            .to_string();
        Ok(hash)
    }

    /// Check a plaintext password against a stored PHC string
    ///
    /// A malformed stored hash counts as a mismatch.
    pub fn verify_password(&self, stored_hash: &str, password: &str) -> Result<bool, InternalError> {
        let parsed = match PasswordHash::new(stored_hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Stored password hash could not be parsed: {}", e);
                return Ok(false);
            }
        };

        Ok(self
            .argon2()?
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    /// Spend the same effort as a real verification when the email is unknown
    pub fn burn_verification(&self, password: &str) -> Result<(), InternalError> {
        let dummy = match self.dummy_hash.get() {
            Some(hash) => hash.clone(),
            None => {
                let hash = self.hash_password("unused-placeholder-password")?;
                self.dummy_hash.get_or_init(|| hash).clone()
            }
        };
        self.verify_password(&dummy, password)?;
        Ok(())
    }

    /// 32 random bytes, base64-encoded
    pub fn generate_session_token(&self) -> SessionToken {
        let mut rng = rand::rng();
        let random_bytes: [u8; 32] = rng.random();
        SessionToken::from(general_purpose::STANDARD.encode(random_bytes))
    }

    /// HMAC-SHA256 of a session token as lowercase hex
    pub fn hash_session_token(&self, token: &str) -> Result<String, InternalError> {
        let mut mac = HmacSha256::new_from_slice(self.session_secret.as_bytes())
            .map_err(|e| InternalError::crypto("hmac_init", e.to_string()))?;
        mac.update(token.as_bytes());
        Ok(format!("{:x}", mac.finalize().into_bytes()))
    }
}

/// Employee number: "SAV" + year + four random digits
pub fn generate_employee_id(year: i32) -> String {
    let suffix = rand::rng().random_range(1000..=9999);
    format!("SAV{}{}", year, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crypto() -> CryptoService {
        CryptoService::new(
            "test-pepper-for-unit-tests",
            "test-session-secret-minimum-32-characters",
        )
    }

    #[test]
    fn test_hash_and_verify_password() {
        let crypto = crypto();
        let hash = crypto.hash_password("Str0ngPassw0rd").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(crypto.verify_password(&hash, "Str0ngPassw0rd").unwrap());
        assert!(!crypto.verify_password(&hash, "wrong-password").unwrap());
    }

    #[test]
    fn test_pepper_is_part_of_the_hash() {
        let hash = crypto().hash_password("Str0ngPassw0rd").unwrap();
        let other = CryptoService::new("a-different-pepper-value", "test-session-secret-minimum-32-characters");

        assert!(!other.verify_password(&hash, "Str0ngPassw0rd").unwrap());
    }

    #[test]
    fn test_malformed_hash_is_a_mismatch() {
        assert!(!crypto().verify_password("not-a-phc-string", "anything").unwrap());
    }

    #[test]
    fn test_session_tokens_are_unique_and_base64() {
        let crypto = crypto();
        let a = crypto.generate_session_token();
        let b = crypto.generate_session_token();

        assert_ne!(a.as_str(), b.as_str());
        assert_eq!(a.as_str().len(), 44);
    }

    #[test]
    fn test_session_token_hash_is_stable_hex() {
        let crypto = crypto();
        let first = crypto.hash_session_token("token").unwrap();
        let second = crypto.hash_session_token("token").unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(first, crypto.hash_session_token("other-token").unwrap());
    }

    #[test]
    fn test_employee_id_format() {
        for _ in 0..50 {
            let id = generate_employee_id(2025);
            assert_eq!(id.len(), 11);
            assert!(id.starts_with("SAV2025"));
            let suffix: u32 = id[7..].parse().unwrap();
            assert!((1000..=9999).contains(&suffix));
        }
    }
}
