//! Credential stores for the two identity types
//!
//! Authentication and signup reach accounts only through [`CredentialStore`],
//! so the same flows run against PostgreSQL in production and against
//! [`MemoryCredentialStore`] in tests and local development.

use crate::repositories::{
    HallAdminRecord, HallAdminRepository, HallLink, StudentRecord, StudentRepository,
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

/// Failures when creating accounts
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Identifier already registered: {0}")]
    Duplicate(String),

    #[error("Unknown hall: {0}")]
    UnknownHall(String),

    #[error("Hall {hall} is already administered by {admin_id}")]
    HallTaken { hall: String, admin_id: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// New student account with an already hashed password
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub matric_number: String,
    pub name: String,
    pub password_hash: String,
}

/// New hall admin account with an already hashed password
#[derive(Debug, Clone)]
pub struct NewHallAdmin {
    pub staff_id: String,
    pub name: String,
    pub hall: String,
    pub password_hash: String,
}

/// Lookup and creation of student and hall admin accounts
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_student(&self, matric_number: &str) -> Result<Option<StudentRecord>>;

    async fn find_hall_admin(&self, staff_id: &str) -> Result<Option<HallAdminRecord>>;

    async fn set_student_logged_in(&self, matric_number: &str, logged_in: bool) -> Result<()>;

    async fn create_student(&self, student: NewStudent) -> Result<StudentRecord, StoreError>;

    /// Create the admin and set it as its hall's admin in one step
    ///
    /// A hall keeps its first admin; later signups for it fail with
    /// [`StoreError::HallTaken`].
    async fn create_hall_admin(&self, admin: NewHallAdmin) -> Result<HallAdminRecord, StoreError>;
}

/// PostgreSQL-backed credential store
#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// SQLSTATE 23505
fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .and_then(|db| db.code())
        .is_some_and(|code| code == "23505")
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_student(&self, matric_number: &str) -> Result<Option<StudentRecord>> {
        StudentRepository::find_by_matric_number(&self.pool, matric_number).await
    }

    async fn find_hall_admin(&self, staff_id: &str) -> Result<Option<HallAdminRecord>> {
        HallAdminRepository::find_by_staff_id(&self.pool, staff_id).await
    }

    async fn set_student_logged_in(&self, matric_number: &str, logged_in: bool) -> Result<()> {
        StudentRepository::set_logged_in(&self.pool, matric_number, logged_in).await
    }

    async fn create_student(&self, student: NewStudent) -> Result<StudentRecord, StoreError> {
        StudentRepository::create(
            &self.pool,
            &student.matric_number,
            &student.name,
            &student.password_hash,
        )
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::Duplicate(student.matric_number.clone())
            } else {
                StoreError::Other(e)
            }
        })
    }

    async fn create_hall_admin(&self, admin: NewHallAdmin) -> Result<HallAdminRecord, StoreError> {
        let link = HallAdminRepository::create_and_link(
            &self.pool,
            &admin.staff_id,
            &admin.name,
            &admin.hall,
            &admin.password_hash,
        )
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::Duplicate(admin.staff_id.clone())
            } else {
                StoreError::Other(e)
            }
        })?;

        match link {
            HallLink::Linked(record) => Ok(record),
            HallLink::UnknownHall => Err(StoreError::UnknownHall(admin.hall)),
            HallLink::Taken(admin_id) => Err(StoreError::HallTaken {
                hall: admin.hall,
                admin_id,
            }),
        }
    }
}

#[derive(Default)]
struct MemoryAccounts {
    students: HashMap<String, StudentRecord>,
    admins: HashMap<String, HallAdminRecord>,
    /// hall name -> linked admin
    halls: HashMap<String, Option<String>>,
}

/// In-memory credential store for tests and local development
#[derive(Default)]
pub struct MemoryCredentialStore {
    accounts: RwLock<MemoryAccounts>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with the given halls provisioned
    pub fn with_halls<I, S>(halls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let accounts = MemoryAccounts {
            halls: halls.into_iter().map(|h| (h.into(), None)).collect(),
            ..Default::default()
        };
        Self {
            accounts: RwLock::new(accounts),
        }
    }

    /// Insert a student record as-is, bypassing signup
    pub async fn insert_student(&self, record: StudentRecord) {
        self.accounts
            .write()
            .await
            .students
            .insert(record.matric_number.clone(), record);
    }

    /// Admin currently linked to a hall
    pub async fn hall_admin_id(&self, hall: &str) -> Option<String> {
        self.accounts.read().await.halls.get(hall).cloned().flatten()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_student(&self, matric_number: &str) -> Result<Option<StudentRecord>> {
        Ok(self.accounts.read().await.students.get(matric_number).cloned())
    }

    async fn find_hall_admin(&self, staff_id: &str) -> Result<Option<HallAdminRecord>> {
        Ok(self.accounts.read().await.admins.get(staff_id).cloned())
    }

    async fn set_student_logged_in(&self, matric_number: &str, logged_in: bool) -> Result<()> {
        if let Some(student) = self.accounts.write().await.students.get_mut(matric_number) {
            student.logged_in = logged_in;
        }
        Ok(())
    }

    async fn create_student(&self, student: NewStudent) -> Result<StudentRecord, StoreError> {
        let mut accounts = self.accounts.write().await;
        if accounts.students.contains_key(&student.matric_number) {
            return Err(StoreError::Duplicate(student.matric_number));
        }

        let record = StudentRecord {
            matric_number: student.matric_number,
            name: student.name,
            password_hash: student.password_hash,
            logged_in: false,
            created_at: Utc::now(),
        };
        accounts
            .students
            .insert(record.matric_number.clone(), record.clone());
        Ok(record)
    }

    async fn create_hall_admin(&self, admin: NewHallAdmin) -> Result<HallAdminRecord, StoreError> {
        let mut accounts = self.accounts.write().await;
        match accounts.halls.get(&admin.hall) {
            None => return Err(StoreError::UnknownHall(admin.hall)),
            Some(Some(existing)) => {
                return Err(StoreError::HallTaken {
                    admin_id: existing.clone(),
                    hall: admin.hall,
                })
            }
            Some(None) => {}
        }
        if accounts.admins.contains_key(&admin.staff_id) {
            return Err(StoreError::Duplicate(admin.staff_id));
        }

        let record = HallAdminRecord {
            staff_id: admin.staff_id,
            name: admin.name,
            hall: admin.hall,
            password_hash: admin.password_hash,
            created_at: Utc::now(),
        };
        accounts
            .halls
            .insert(record.hall.clone(), Some(record.staff_id.clone()));
        accounts
            .admins
            .insert(record.staff_id.clone(), record.clone());
        Ok(record)
    }
}
