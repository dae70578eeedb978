//! Hall service

use crate::error::ApiError;
use crate::repositories::HallRepository;
use hall_complaints_shared::Hall;
use sqlx::PgPool;

/// Hall service
pub struct HallService;

impl HallService {
    /// All halls with their linked admin
    pub async fn list(pool: &PgPool) -> Result<Vec<Hall>, ApiError> {
        let halls = HallRepository::list(pool)
            .await
            .map_err(ApiError::Internal)?;
        Ok(halls.into_iter().map(Into::into).collect())
    }
}
