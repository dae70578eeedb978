//! Account service for student and hall admin signup
//!
//! Password hashing runs on the blocking thread pool. Accounts are created
//! through the [`CredentialStore`] so the same code runs against PostgreSQL
//! and the in-memory store.

use crate::auth::{AuthError, CredentialStore, NewHallAdmin, NewStudent, PasswordService, StoreError};
use crate::error::ApiError;
use crate::repositories::{HallAdminRecord, StudentRecord};
use hall_complaints_shared::validation::{validate_hall_name, validate_identifier, validate_password};
use hall_complaints_shared::{HallAdminSignupForm, StudentSignupForm};
use tracing::info;
use validator::Validate;

/// Account service for signup operations
pub struct AccountService;

impl AccountService {
    /// Register a new student
    ///
    /// An already registered matriculation number is a
    /// `DuplicateIdentifier`, whether caught by the pre-check or by the
    /// store's uniqueness constraint.
    pub async fn signup_student(
        store: &dyn CredentialStore,
        passwords: &PasswordService,
        form: &StudentSignupForm,
    ) -> Result<StudentRecord, ApiError> {
        form.validate()?;
        validate_identifier(&form.matric_number).map_err(ApiError::Validation)?;
        validate_password(&form.password).map_err(ApiError::Validation)?;

        if store
            .find_student(&form.matric_number)
            .await
            .map_err(ApiError::Internal)?
            .is_some()
        {
            return Err(AuthError::DuplicateIdentifier(form.matric_number.clone()).into());
        }

        let password_hash = passwords
            .hash_async(form.password.clone())
            .await
            .map_err(|e| ApiError::Internal(e.into()))?;

        let student = store
            .create_student(NewStudent {
                matric_number: form.matric_number.clone(),
                name: form.name.trim().to_string(),
                password_hash,
            })
            .await
            .map_err(store_error)?;

        info!(matric_number = %student.matric_number, "Student registered");
        Ok(student)
    }

    /// Register a new hall admin and link them to their hall
    ///
    /// The hall must already exist and is matched by exact name.
    pub async fn signup_hall_admin(
        store: &dyn CredentialStore,
        passwords: &PasswordService,
        form: &HallAdminSignupForm,
    ) -> Result<HallAdminRecord, ApiError> {
        form.validate()?;
        validate_identifier(&form.staff_id).map_err(ApiError::Validation)?;
        validate_hall_name(&form.hall).map_err(ApiError::Validation)?;
        validate_password(&form.password).map_err(ApiError::Validation)?;

        if store
            .find_hall_admin(&form.staff_id)
            .await
            .map_err(ApiError::Internal)?
            .is_some()
        {
            return Err(AuthError::DuplicateIdentifier(form.staff_id.clone()).into());
        }

        let password_hash = passwords
            .hash_async(form.password.clone())
            .await
            .map_err(|e| ApiError::Internal(e.into()))?;

        let admin = store
            .create_hall_admin(NewHallAdmin {
                staff_id: form.staff_id.clone(),
                name: form.name.trim().to_string(),
                hall: form.hall.clone(),
                password_hash,
            })
            .await
            .map_err(store_error)?;

        info!(staff_id = %admin.staff_id, hall = %admin.hall, "Hall admin registered");
        Ok(admin)
    }
}

fn store_error(err: StoreError) -> ApiError {
    match err {
        StoreError::Duplicate(id) => AuthError::DuplicateIdentifier(id).into(),
        StoreError::UnknownHall(hall) => ApiError::Validation(format!("Unknown hall: {}", hall)),
        StoreError::HallTaken { hall, .. } => {
            ApiError::Conflict(format!("{} already has an administrator", hall))
        }
        StoreError::Other(e) => ApiError::Internal(e),
    }
}
