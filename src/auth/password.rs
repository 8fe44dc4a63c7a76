use bcrypt::{hash, verify};
use thiserror::Error;

use crate::validation::PASSWORD_MAX_CHARS;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Password must not be empty")]
    Empty,

    #[error("Password must be less than 128 characters")]
    TooLong,

    #[error("Failed to hash password: {0}")]
    Hashing(String),
}

/// Cheapest bcrypt work factor accepted. Tests use it to keep hashing fast.
pub const MIN_COST: u32 = 4;

/// Most expensive bcrypt work factor accepted.
pub const MAX_COST: u32 = 31;

/// One-way password hashing with a fresh random salt per call (bcrypt).
#[derive(Debug, Clone, Copy)]
pub struct CredentialHasher {
    cost: u32,
}

impl CredentialHasher {
    /// `cost` is the bcrypt work factor (`MIN_COST..=MAX_COST`).
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, password: &str) -> Result<String, CredentialError> {
        if password.is_empty() {
            return Err(CredentialError::Empty);
        }
        if password.chars().count() > PASSWORD_MAX_CHARS {
            return Err(CredentialError::TooLong);
        }
        hash(password, self.cost).map_err(|e| CredentialError::Hashing(e.to_string()))
    }

    /// Returns `true` iff `password` matches `hashed`. A malformed hash is a mismatch,
    /// not an error.
    pub fn verify(&self, hashed: &str, password: &str) -> bool {
        match verify(password, hashed) {
            Ok(matches) => matches,
            Err(e) => {
                log::warn!("stored credential hash could not be parsed: {}", e);
                false
            }
        }
    }
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> CredentialHasher {
        CredentialHasher::new(MIN_COST)
    }

    #[test]
    fn test_password_hashing_and_verification() {
        let password = "test_password123";
        let hashed = hasher().hash(password).unwrap();

        assert!(hasher().verify(&hashed, password));
        assert!(!hasher().verify(&hashed, "wrong_password"));
    }

    #[test]
    fn test_cost_is_encoded_in_hash() {
        let hashed = hasher().hash("secret1").unwrap();
        assert!(hashed.starts_with("$2b$04$"), "unexpected hash prefix: {}", hashed);
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hasher().hash("secret1").unwrap();
        let second = hasher().hash("secret1").unwrap();

        assert_ne!(first, second);
        assert!(hasher().verify(&first, "secret1"));
        assert!(hasher().verify(&second, "secret1"));
    }

    #[test]
    fn test_verify_with_invalid_hash() {
        assert!(!hasher().verify("invalidhashformat", "test_password123"));
        assert!(!hasher().verify("", "test_password123"));
    }

    #[test]
    fn test_rejects_empty_and_oversized() {
        assert_eq!(hasher().hash(""), Err(CredentialError::Empty));
        assert_eq!(hasher().hash(&"p".repeat(129)), Err(CredentialError::TooLong));
        assert!(hasher().hash(&"p".repeat(128)).is_ok());
    }
}
