//! Student problem routes

use crate::auth::AuthStudent;
use crate::error::ApiResult;
use crate::services::ProblemService;
use crate::state::AppState;
use axum::{extract::State, response::Redirect, routing::get, Form, Json, Router};
use hall_complaints_shared::{Problem, ProblemForm};

/// Create problem routes
pub fn problem_routes() -> Router<AppState> {
    Router::new().route("/problems", get(list_own_problems).post(submit_problem))
}

/// GET /problems - Problems the current student has submitted
async fn list_own_problems(
    State(state): State<AppState>,
    AuthStudent(student): AuthStudent,
) -> ApiResult<Json<Vec<Problem>>> {
    let problems = ProblemService::list_for_student(state.db(), &student.matric_number).await?;
    Ok(Json(problems))
}

/// POST /problems - Submit a problem, then return to the problem page
async fn submit_problem(
    State(state): State<AppState>,
    AuthStudent(student): AuthStudent,
    Form(form): Form<ProblemForm>,
) -> ApiResult<Redirect> {
    ProblemService::submit(state.db(), &student.matric_number, &form).await?;
    Ok(Redirect::to("/problems"))
}
