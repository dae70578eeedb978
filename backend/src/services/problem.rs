//! Problem service for submitting and listing hall problems

use crate::error::ApiError;
use crate::repositories::{CreateProblem, HallRepository, ProblemRepository};
use chrono::Utc;
use hall_complaints_shared::{Problem, ProblemForm};
use sqlx::PgPool;
use tracing::info;
use validator::Validate;

/// Problem service
pub struct ProblemService;

impl ProblemService {
    /// Build the insert for a submitted form, stamped with the current time
    ///
    /// The submitting student comes from the session, never the form.
    pub fn prepare(student_id: &str, form: &ProblemForm) -> Result<CreateProblem, ApiError> {
        form.validate()?;
        for (field, value) in [
            ("room", &form.room),
            ("category", &form.category),
            ("description", &form.description),
        ] {
            if value.trim().is_empty() {
                return Err(ApiError::Validation(format!("{} cannot be blank", field)));
            }
        }

        Ok(CreateProblem {
            hall: form.hall.clone(),
            room: form.room.trim().to_string(),
            category: form.category.trim().to_string(),
            description: form.description.trim().to_string(),
            date_submitted: Utc::now(),
            student_id: student_id.to_string(),
        })
    }

    /// Submit a problem for a hall
    pub async fn submit(
        pool: &PgPool,
        student_id: &str,
        form: &ProblemForm,
    ) -> Result<Problem, ApiError> {
        let input = Self::prepare(student_id, form)?;

        if !HallRepository::exists(pool, &input.hall)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::Validation(format!("Unknown hall: {}", input.hall)));
        }

        let problem = ProblemRepository::create(pool, input)
            .await
            .map_err(ApiError::Internal)?;

        info!(problem_id = %problem.id, hall = %problem.hall, "Problem submitted");
        Ok(problem.into())
    }

    /// Problems for a hall, newest first
    pub async fn list_for_hall(pool: &PgPool, hall: &str) -> Result<Vec<Problem>, ApiError> {
        let problems = ProblemRepository::list_by_hall(pool, hall)
            .await
            .map_err(ApiError::Internal)?;
        Ok(problems.into_iter().map(Into::into).collect())
    }

    /// Problems a student has submitted, newest first
    pub async fn list_for_student(pool: &PgPool, student_id: &str) -> Result<Vec<Problem>, ApiError> {
        let problems = ProblemRepository::list_by_student(pool, student_id)
            .await
            .map_err(ApiError::Internal)?;
        Ok(problems.into_iter().map(Into::into).collect())
    }
}
