//! Authentication error taxonomy

use super::password::PasswordError;
use thiserror::Error;

/// Failures while authenticating or registering a principal
///
/// A wrong password is not listed here; it is reported as
/// [`AuthOutcome::Rejected`](super::AuthOutcome::Rejected).
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("User not found")]
    UserNotFound,

    #[error("Account belongs to hall '{assigned}', not '{requested}'")]
    HallMismatch { assigned: String, requested: String },

    #[error("Password verification failed: {0}")]
    HashVerification(#[from] PasswordError),

    #[error("Identifier already registered: {0}")]
    DuplicateIdentifier(String),

    #[error("Credential store error: {0}")]
    Store(#[from] anyhow::Error),
}
