//! Student repository for database operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use hall_complaints_shared::Student;
use sqlx::PgPool;

/// Student record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StudentRecord {
    pub matric_number: String,
    pub name: String,
    pub password_hash: String,
    pub logged_in: bool,
    pub created_at: DateTime<Utc>,
}

impl From<StudentRecord> for Student {
    fn from(record: StudentRecord) -> Self {
        Self {
            matric_number: record.matric_number,
            name: record.name,
            logged_in: record.logged_in,
        }
    }
}

/// Student repository for database operations
pub struct StudentRepository;

impl StudentRepository {
    /// Create a new student
    pub async fn create(
        pool: &PgPool,
        matric_number: &str,
        name: &str,
        password_hash: &str,
    ) -> Result<StudentRecord> {
        let student = sqlx::query_as::<_, StudentRecord>(
            r#"
            INSERT INTO students (matric_number, name, password_hash)
            VALUES ($1, $2, $3)
            RETURNING matric_number, name, password_hash, logged_in, created_at
            "#,
        )
        .bind(matric_number)
        .bind(name)
        .bind(password_hash)
        .fetch_one(pool)
        .await?;

        Ok(student)
    }

    /// Find student by matriculation number
    pub async fn find_by_matric_number(
        pool: &PgPool,
        matric_number: &str,
    ) -> Result<Option<StudentRecord>> {
        let student = sqlx::query_as::<_, StudentRecord>(
            r#"
            SELECT matric_number, name, password_hash, logged_in, created_at
            FROM students
            WHERE matric_number = $1
            "#,
        )
        .bind(matric_number)
        .fetch_optional(pool)
        .await?;

        Ok(student)
    }

    /// Set the logged-in flag
    pub async fn set_logged_in(pool: &PgPool, matric_number: &str, logged_in: bool) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE students SET logged_in = $2
            WHERE matric_number = $1
            "#,
        )
        .bind(matric_number)
        .bind(logged_in)
        .execute(pool)
        .await?;

        Ok(())
    }
}
