//! Password hashing with Argon2id.
//!
//! Hashes are PHC strings, so verification reads its parameters from the
//! stored hash and keeps working if the hashing parameters change later.

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};
use tracing::{debug, error};

use crate::core::error::{AppError, Result};

#[derive(Clone, Default)]
pub struct PasswordService {
    params: Params,
}

impl PasswordService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use explicit Argon2 cost parameters (memory KiB, iterations, lanes)
    pub fn with_cost(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self> {
        let params = Params::new(m_cost, t_cost, p_cost, None)
            .map_err(|e| AppError::Internal(format!("Invalid Argon2 parameters: {}", e)))?;
        Ok(Self { params })
    }

    fn hasher(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a plain-text password into a PHC string
    pub fn hash(&self, password: &str) -> Result<String> {
        if password.is_empty() {
            return Err(AppError::Validation(
                "Password cannot be empty".to_string(),
            ));
        }

        let salt = SaltString::generate(&mut OsRng);
        self.hasher()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| {
                error!(error = %e, "Argon2 password hashing failed");
                AppError::Internal(format!("Password hashing failed: {}", e))
            })
    }

    /// Check a plain-text password against a stored hash
    ///
    /// A mismatch is `Ok(false)`; only a corrupt stored hash is an error.
    pub fn verify(&self, stored_hash: &str, password: &str) -> Result<bool> {
        let parsed = PasswordHash::new(stored_hash).map_err(|e| {
            error!(error = %e, "Stored password hash is not a valid PHC string");
            AppError::Internal(format!("Invalid stored password hash: {}", e))
        })?;

        match self.hasher().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => {
                debug!("Password verification failed: mismatch");
                Ok(false)
            }
            Err(e) => Err(AppError::Internal(format!(
                "Password verification failed: {}",
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> PasswordService {
        PasswordService::with_cost(1024, 1, 1).unwrap()
    }

    #[test]
    fn test_hash_is_not_plaintext_and_verifies() {
        let service = cheap();
        let hash = service.hash("admin123").unwrap();

        assert_ne!(hash, "admin123");
        assert!(hash.starts_with("$argon2id$"));
        assert!(service.verify(&hash, "admin123").unwrap());
        assert!(!service.verify(&hash, "admin124").unwrap());
    }

    #[test]
    fn test_same_password_hashes_differently() {
        let service = cheap();
        assert_ne!(
            service.hash("admin123").unwrap(),
            service.hash("admin123").unwrap()
        );
    }

    #[test]
    fn test_empty_password_rejected() {
        assert!(matches!(cheap().hash(""), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_corrupt_stored_hash_is_internal_error() {
        assert!(matches!(
            cheap().verify("plaintext-in-db", "x"),
            Err(AppError::Internal(_))
        ));
    }
}
