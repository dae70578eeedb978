//! Identity providers for students and hall admins
//!
//! Both identity types go through one verification routine. A provider
//! variant decides which store is searched, which extra scope check
//! applies, and what happens after a successful login:
//!
//! | Provider    | Identifier       | Scope check                 | After login          |
//! |-------------|------------------|-----------------------------|----------------------|
//! | `Student`   | matriculation no | none                        | `logged_in = true`   |
//! | `HallAdmin` | staff ID         | stored hall == path hall    | none                 |

use super::error::AuthError;
use super::password::PasswordService;
use super::session::SessionPrincipal;
use super::store::CredentialStore;
use crate::repositories::{HallAdminRecord, StudentRecord};
use anyhow::Result;
use hall_complaints_shared::{PrincipalKind, SessionResponse};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// An authenticated account
#[derive(Debug, Clone)]
pub enum Principal {
    Student(StudentRecord),
    HallAdmin(HallAdminRecord),
}

impl Principal {
    pub fn kind(&self) -> PrincipalKind {
        match self {
            Principal::Student(_) => PrincipalKind::Student,
            Principal::HallAdmin(_) => PrincipalKind::HallAdmin,
        }
    }

    /// Matriculation number or staff ID
    pub fn id(&self) -> &str {
        match self {
            Principal::Student(s) => &s.matric_number,
            Principal::HallAdmin(a) => &a.staff_id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Principal::Student(s) => &s.name,
            Principal::HallAdmin(a) => &a.name,
        }
    }

    fn password_hash(&self) -> &str {
        match self {
            Principal::Student(s) => &s.password_hash,
            Principal::HallAdmin(a) => &a.password_hash,
        }
    }

    /// The minimal identity kept in a session slot
    pub fn session_principal(&self) -> SessionPrincipal {
        SessionPrincipal {
            kind: self.kind(),
            id: self.id().to_string(),
        }
    }

    pub fn to_session_response(&self) -> SessionResponse {
        SessionResponse {
            kind: self.kind(),
            id: self.id().to_string(),
            name: self.name().to_string(),
            hall: match self {
                Principal::Student(_) => None,
                Principal::HallAdmin(a) => Some(a.hall.clone()),
            },
        }
    }
}

/// Result of a credential check that did not fail outright
#[derive(Debug)]
pub enum AuthOutcome {
    Authenticated(Principal),
    /// Password mismatch; no session is established
    Rejected,
}

/// Credential verification procedure bound to one identity type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityProvider {
    Student,
    /// Admin login through the path of `hall`
    HallAdmin { hall: String },
}

impl IdentityProvider {
    pub fn name(&self) -> &'static str {
        match self {
            IdentityProvider::Student => "student",
            IdentityProvider::HallAdmin { .. } => "hall-admin",
        }
    }

    async fn lookup(
        &self,
        store: &dyn CredentialStore,
        identifier: &str,
    ) -> Result<Option<Principal>> {
        Ok(match self {
            IdentityProvider::Student => {
                store.find_student(identifier).await?.map(Principal::Student)
            }
            IdentityProvider::HallAdmin { .. } => {
                store.find_hall_admin(identifier).await?.map(Principal::HallAdmin)
            }
        })
    }

    fn check_scope(&self, principal: &Principal) -> Result<(), AuthError> {
        match (self, principal) {
            (IdentityProvider::HallAdmin { hall }, Principal::HallAdmin(admin))
                if admin.hall != *hall =>
            {
                Err(AuthError::HallMismatch {
                    assigned: admin.hall.clone(),
                    requested: hall.clone(),
                })
            }
            _ => Ok(()),
        }
    }

    async fn after_authenticated(
        &self,
        store: &dyn CredentialStore,
        principal: &mut Principal,
    ) -> Result<()> {
        if let Principal::Student(student) = principal {
            store
                .set_student_logged_in(&student.matric_number, true)
                .await?;
            student.logged_in = true;
        }
        Ok(())
    }
}

/// Runs identity providers against a credential store
#[derive(Clone)]
pub struct Authenticator {
    store: Arc<dyn CredentialStore>,
}

impl Authenticator {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn CredentialStore {
        self.store.as_ref()
    }

    /// Verify `identifier`/`password` with the given provider
    ///
    /// Errors with `UserNotFound`, `HallMismatch` or `HashVerification`;
    /// a wrong password yields `Ok(AuthOutcome::Rejected)`.
    pub async fn authenticate(
        &self,
        provider: &IdentityProvider,
        identifier: &str,
        password: &str,
    ) -> Result<AuthOutcome, AuthError> {
        let mut principal = provider
            .lookup(self.store(), identifier)
            .await?
            .ok_or_else(|| {
                debug!(provider = provider.name(), identifier, "Unknown identifier");
                AuthError::UserNotFound
            })?;

        if let Err(err) = provider.check_scope(&principal) {
            warn!(provider = provider.name(), identifier, error = %err, "Scope check failed");
            return Err(err);
        }

        let valid = PasswordService::verify_async(
            password.to_string(),
            principal.password_hash().to_string(),
        )
        .await?;

        if !valid {
            debug!(provider = provider.name(), identifier, "Password mismatch");
            return Ok(AuthOutcome::Rejected);
        }

        provider.after_authenticated(self.store(), &mut principal).await?;

        info!(provider = provider.name(), identifier, "Authenticated");
        Ok(AuthOutcome::Authenticated(principal))
    }

    /// Re-read the account named by a session slot
    ///
    /// `Ok(None)` when the account no longer exists.
    pub async fn load_principal(&self, session: &SessionPrincipal) -> Result<Option<Principal>> {
        Ok(match session.kind {
            PrincipalKind::Student => self
                .store
                .find_student(&session.id)
                .await?
                .map(Principal::Student),
            PrincipalKind::HallAdmin => self
                .store
                .find_hall_admin(&session.id)
                .await?
                .map(Principal::HallAdmin),
        })
    }
}
