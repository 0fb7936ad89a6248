//! Password hashing and verification using Argon2id

use crate::{config::SecurityConfig, error::AppError};
use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

/// Password hasher with configurable cost parameters
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Build a hasher from the configured Argon2 cost parameters
    pub fn from_config(security: &SecurityConfig) -> Result<Self, AppError> {
        let params = Params::new(
            security.argon2_memory_kib,
            security.argon2_iterations,
            security.argon2_parallelism,
            None,
        )
        .map_err(|e| AppError::Config(format!("Invalid Argon2 parameters: {}", e)))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash a password into a PHC string with a fresh random salt
    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);

        let password_hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!("Failed to hash password: {:?}", e);
                AppError::Internal(format!("Failed to hash password: {}", e))
            })?
            .to_string();

        Ok(password_hash)
    }

    /// Check a password against a stored digest.
    ///
    /// A digest that cannot be parsed counts as a mismatch. The parameters
    /// embedded in the digest win over the configured ones, so rows hashed
    /// under older cost settings keep verifying.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(error = %e, "Stored password digest is malformed");
                return false;
            }
        };

        self.argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }

    /// Validate password against policy
    pub fn validate_password_policy(
        password: &str,
        policy: &SecurityConfig,
    ) -> Result<(), AppError> {
        if password.chars().count() < policy.password_min_length {
            return Err(AppError::BadRequest(format!(
                "Password must be at least {} characters",
                policy.password_min_length
            )));
        }

        if policy.password_require_uppercase && !password.chars().any(|c| c.is_uppercase()) {
            return Err(AppError::BadRequest(
                "Password must contain at least one uppercase letter".to_string(),
            ));
        }

        if policy.password_require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(AppError::BadRequest(
                "Password must contain at least one digit".to_string(),
            ));
        }

        if policy.password_require_special && password.chars().all(|c| c.is_alphanumeric()) {
            return Err(AppError::BadRequest(
                "Password must contain at least one special character".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;

    fn hasher() -> PasswordHasher {
        PasswordHasher::from_config(&test_config().security).unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = hasher();
        let hash = hasher.hash("password123").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("password123", &hash));
    }

    #[test]
    fn test_verify_fails_with_wrong_password() {
        let hasher = hasher();
        let hash = hasher.hash("password123").unwrap();

        assert!(!hasher.verify("password124", &hash));
        assert!(!hasher.verify("", &hash));
    }

    #[test]
    fn test_verify_malformed_digest_is_mismatch() {
        let hasher = hasher();

        assert!(!hasher.verify("password123", "not-a-phc-string"));
        assert!(!hasher.verify("password123", ""));
    }

    #[test]
    fn test_hash_is_different_each_time() {
        let hasher = hasher();

        let hash1 = hasher.hash("password123").unwrap();
        let hash2 = hasher.hash("password123").unwrap();

        // Salted
        assert_ne!(hash1, hash2);
        assert!(hasher.verify("password123", &hash1));
        assert!(hasher.verify("password123", &hash2));
    }

    #[test]
    fn test_invalid_cost_parameters_rejected() {
        let mut security = test_config().security;
        security.argon2_memory_kib = 1;

        assert!(matches!(
            PasswordHasher::from_config(&security),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_password_policy_validation() {
        let mut policy = test_config().security;
        policy.password_require_uppercase = true;
        policy.password_require_digit = true;

        assert!(PasswordHasher::validate_password_policy("Test1234", &policy).is_ok());
        assert!(PasswordHasher::validate_password_policy("Test1", &policy).is_err());
        assert!(PasswordHasher::validate_password_policy("test1234", &policy).is_err());
        assert!(PasswordHasher::validate_password_policy("Testtest", &policy).is_err());

        policy.password_require_special = true;
        assert!(PasswordHasher::validate_password_policy("Test1234", &policy).is_err());
        assert!(PasswordHasher::validate_password_policy("Test1234!", &policy).is_ok());
    }
}
