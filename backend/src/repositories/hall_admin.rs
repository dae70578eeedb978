//! Hall admin repository for database operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use hall_complaints_shared::HallAdmin;
use sqlx::PgPool;

/// Hall admin record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HallAdminRecord {
    pub staff_id: String,
    pub name: String,
    pub hall: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl From<HallAdminRecord> for HallAdmin {
    fn from(record: HallAdminRecord) -> Self {
        Self {
            staff_id: record.staff_id,
            name: record.name,
            hall: record.hall,
        }
    }
}

/// Result of linking a new admin to a hall
#[derive(Debug)]
pub enum HallLink {
    Linked(HallAdminRecord),
    UnknownHall,
    /// The hall already has this admin
    Taken(String),
}

/// Hall admin repository for database operations
pub struct HallAdminRepository;

impl HallAdminRepository {
    /// Create a hall admin and link them to their hall
    ///
    /// The insert and the hall update share one transaction, so a failure
    /// between them leaves neither behind. Nothing is written when the hall
    /// does not exist or already has an admin.
    pub async fn create_and_link(
        pool: &PgPool,
        staff_id: &str,
        name: &str,
        hall: &str,
        password_hash: &str,
    ) -> Result<HallLink> {
        let mut tx = pool.begin().await?;

        // Lock the hall row so two signups for one hall serialize
        let current_admin = sqlx::query_scalar::<_, Option<String>>(
            r#"
            SELECT admin_id FROM halls WHERE name = $1 FOR UPDATE
            "#,
        )
        .bind(hall)
        .fetch_optional(&mut *tx)
        .await?;

        match current_admin {
            None => {
                tx.rollback().await?;
                return Ok(HallLink::UnknownHall);
            }
            Some(Some(existing)) => {
                tx.rollback().await?;
                return Ok(HallLink::Taken(existing));
            }
            Some(None) => {}
        }

        let admin = sqlx::query_as::<_, HallAdminRecord>(
            r#"
            INSERT INTO hall_admins (staff_id, name, hall, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING staff_id, name, hall, password_hash, created_at
            "#,
        )
        .bind(staff_id)
        .bind(name)
        .bind(hall)
        .bind(password_hash)
        .fetch_one(&mut *tx)
        .await?;

        // Exact name match only
        sqlx::query(
            r#"
            UPDATE halls SET admin_id = $1
            WHERE name = $2
            "#,
        )
        .bind(&admin.staff_id)
        .bind(hall)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(HallLink::Linked(admin))
    }

    /// Find hall admin by staff ID
    pub async fn find_by_staff_id(pool: &PgPool, staff_id: &str) -> Result<Option<HallAdminRecord>> {
        let admin = sqlx::query_as::<_, HallAdminRecord>(
            r#"
            SELECT staff_id, name, hall, password_hash, created_at
            FROM hall_admins
            WHERE staff_id = $1
            "#,
        )
        .bind(staff_id)
        .fetch_optional(pool)
        .await?;

        Ok(admin)
    }
}
