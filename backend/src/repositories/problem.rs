//! Problem repository for database operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use hall_complaints_shared::Problem;
use sqlx::PgPool;
use uuid::Uuid;

/// Problem record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProblemRecord {
    pub id: Uuid,
    pub hall: String,
    pub room: String,
    pub category: String,
    pub description: String,
    pub date_submitted: DateTime<Utc>,
    pub student_id: String,
}

impl From<ProblemRecord> for Problem {
    fn from(record: ProblemRecord) -> Self {
        Self {
            id: record.id,
            hall: record.hall,
            room: record.room,
            category: record.category,
            description: record.description,
            date_submitted: record.date_submitted,
            student_id: record.student_id,
        }
    }
}

/// Input for creating a problem
#[derive(Debug, Clone)]
pub struct CreateProblem {
    pub hall: String,
    pub room: String,
    pub category: String,
    pub description: String,
    pub date_submitted: DateTime<Utc>,
    pub student_id: String,
}

/// Problem repository for database operations
pub struct ProblemRepository;

impl ProblemRepository {
    /// Create a new problem
    pub async fn create(pool: &PgPool, input: CreateProblem) -> Result<ProblemRecord> {
        let problem = sqlx::query_as::<_, ProblemRecord>(
            r#"
            INSERT INTO problems (hall, room, category, description, date_submitted, student_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, hall, room, category, description, date_submitted, student_id
            "#,
        )
        .bind(&input.hall)
        .bind(&input.room)
        .bind(&input.category)
        .bind(&input.description)
        .bind(input.date_submitted)
        .bind(&input.student_id)
        .fetch_one(pool)
        .await?;

        Ok(problem)
    }

    /// Problems reported in a hall, newest first
    pub async fn list_by_hall(pool: &PgPool, hall: &str) -> Result<Vec<ProblemRecord>> {
        let problems = sqlx::query_as::<_, ProblemRecord>(
            r#"
            SELECT id, hall, room, category, description, date_submitted, student_id
            FROM problems
            WHERE hall = $1
            ORDER BY date_submitted DESC
            "#,
        )
        .bind(hall)
        .fetch_all(pool)
        .await?;

        Ok(problems)
    }

    /// Problems submitted by a student, newest first
    pub async fn list_by_student(pool: &PgPool, student_id: &str) -> Result<Vec<ProblemRecord>> {
        let problems = sqlx::query_as::<_, ProblemRecord>(
            r#"
            SELECT id, hall, room, category, description, date_submitted, student_id
            FROM problems
            WHERE student_id = $1
            ORDER BY date_submitted DESC
            "#,
        )
        .bind(student_id)
        .fetch_all(pool)
        .await?;

        Ok(problems)
    }
}
