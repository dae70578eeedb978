//! Hall repository for database operations

use anyhow::Result;
use hall_complaints_shared::Hall;
use sqlx::PgPool;

/// Hall record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HallRecord {
    pub name: String,
    pub admin_id: Option<String>,
}

impl From<HallRecord> for Hall {
    fn from(record: HallRecord) -> Self {
        Self {
            name: record.name,
            admin_id: record.admin_id,
        }
    }
}

/// Hall repository for database operations
pub struct HallRepository;

impl HallRepository {
    /// List all halls by name
    pub async fn list(pool: &PgPool) -> Result<Vec<HallRecord>> {
        let halls = sqlx::query_as::<_, HallRecord>(
            r#"
            SELECT name, admin_id
            FROM halls
            ORDER BY name
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(halls)
    }

    /// Check if a hall exists
    pub async fn exists(pool: &PgPool, name: &str) -> Result<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM halls WHERE name = $1)
            "#,
        )
        .bind(name)
        .fetch_one(pool)
        .await?;

        Ok(result)
    }
}
