//! Password hashing using bcrypt
//!
//! Provides salted hashing and verification shared by student and
//! hall admin accounts.
//!
//! # Performance Considerations
//!
//! bcrypt is intentionally CPU-intensive. The async variants run on the
//! blocking thread pool so request handling threads stay free.

use thiserror::Error;

/// bcrypt accepts work factors in this range
const MIN_COST: u32 = 4;
const MAX_COST: u32 = 31;

/// Password hashing failures
///
/// A wrong password is not an error: `verify` returns `Ok(false)`.
#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("bcrypt cost {0} is outside 4..=31")]
    InvalidCost(u32),

    #[error("Stored password hash is malformed: {0}")]
    InvalidHash(String),

    #[error("Failed to hash password: {0}")]
    Hashing(String),

    #[error("Task join error: {0}")]
    Join(String),
}

/// Password hashing service
///
/// Holds the configured work factor; cheap to clone.
#[derive(Debug, Clone, Copy)]
pub struct PasswordService {
    cost: u32,
}

impl PasswordService {
    /// Create a hasher with a fixed work factor
    pub fn new(cost: u32) -> Result<Self, PasswordError> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(PasswordError::InvalidCost(cost));
        }
        Ok(Self { cost })
    }

    /// Hash a password (blocking operation)
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        bcrypt::hash(password, self.cost).map_err(|e| PasswordError::Hashing(e.to_string()))
    }

    /// Hash a password asynchronously (non-blocking)
    pub async fn hash_async(&self, password: String) -> Result<String, PasswordError> {
        let service = *self;
        tokio::task::spawn_blocking(move || service.hash(&password))
            .await
            .map_err(|e| PasswordError::Join(e.to_string()))?
    }

    /// Verify a password against a stored digest (blocking operation)
    ///
    /// Returns `Ok(false)` on mismatch and `Err` only when the digest
    /// itself cannot be parsed.
    pub fn verify(password: &str, hash: &str) -> Result<bool, PasswordError> {
        bcrypt::verify(password, hash).map_err(|e| PasswordError::InvalidHash(e.to_string()))
    }

    /// Verify a password asynchronously (non-blocking)
    pub async fn verify_async(password: String, hash: String) -> Result<bool, PasswordError> {
        tokio::task::spawn_blocking(move || Self::verify(&password, &hash))
            .await
            .map_err(|e| PasswordError::Join(e.to_string()))?
    }
}
