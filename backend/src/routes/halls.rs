//! Hall admin routes
//!
//! All handlers require a hall admin session. Problem listings are further
//! restricted to the admin's own hall.

use crate::auth::AuthHallAdmin;
use crate::error::{ApiError, ApiResult};
use crate::services::{HallService, ProblemService};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use hall_complaints_shared::{DashboardResponse, Hall, HallProblemsResponse};

/// Create hall admin routes
pub fn hall_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/halls", get(list_halls))
        .route("/viewproblems/:hall", get(view_problems))
}

/// GET /dashboard - Admin profile and hall overview
async fn dashboard(
    State(state): State<AppState>,
    AuthHallAdmin(admin): AuthHallAdmin,
) -> ApiResult<Json<DashboardResponse>> {
    let halls = HallService::list(state.db()).await?;
    Ok(Json(DashboardResponse {
        admin: admin.into(),
        halls,
    }))
}

/// GET /halls - All halls
async fn list_halls(
    State(state): State<AppState>,
    _admin: AuthHallAdmin,
) -> ApiResult<Json<Vec<Hall>>> {
    Ok(Json(HallService::list(state.db()).await?))
}

/// GET /viewproblems/:hall - Problems reported in the admin's hall
async fn view_problems(
    State(state): State<AppState>,
    AuthHallAdmin(admin): AuthHallAdmin,
    Path(hall): Path<String>,
) -> ApiResult<Json<HallProblemsResponse>> {
    if admin.hall != hall {
        return Err(ApiError::Forbidden(format!(
            "Not an administrator of {}",
            hall
        )));
    }

    let problems = ProblemService::list_for_hall(state.db(), &hall).await?;
    Ok(Json(HallProblemsResponse { hall, problems }))
}
