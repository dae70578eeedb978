//! Authentication routes
//!
//! Signup, login and logout for students and hall admins. Handlers take
//! url-encoded forms and answer with `303 See Other` redirects, setting or
//! clearing the session cookie as they go.
//!
//! # Performance
//!
//! Password hashing and verification run on the blocking thread pool.

use crate::auth::{current_principal, AuthOutcome, IdentityProvider, Principal};
use crate::error::{ApiError, ApiResult};
use crate::services::AccountService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Json, Router,
};
use hall_complaints_shared::{HallAdminSignupForm, LoginForm, StudentSignupForm};
use tracing::{error, info};
use validator::Validate;

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/student/signup", post(student_signup))
        .route("/student/login", post(student_login))
        .route("/halladmin/signup", post(hall_admin_signup))
        .route("/halladmin/login/:hall", post(hall_admin_login))
        .route("/logout", get(logout).post(logout))
        .route("/session", get(current_session))
}

/// Login page for a hall, with the hall name percent-encoded
pub fn hall_admin_login_path(hall: &str) -> String {
    format!("/halladmin/login/{}", urlencoding::encode(hall))
}

/// Attach a fresh session for `principal` and redirect to `to`
async fn start_session(
    state: &AppState,
    headers: &HeaderMap,
    principal: &Principal,
    to: &str,
) -> ApiResult<Response> {
    let previous = state.sessions().token_from_headers(headers);
    let token = state
        .sessions()
        .establish(previous.as_deref(), principal)
        .await?;
    let cookie = state
        .sessions()
        .cookie(&token)
        .map_err(|e| ApiError::Internal(e.into()))?;

    Ok(([(SET_COOKIE, cookie)], Redirect::to(to)).into_response())
}

/// Run a provider and either start a session or send the client to `failure`
async fn login(
    state: &AppState,
    headers: &HeaderMap,
    provider: IdentityProvider,
    form: LoginForm,
    success: &str,
    failure: &str,
) -> ApiResult<Response> {
    form.validate()?;

    match state
        .authenticator()
        .authenticate(&provider, &form.username, &form.password)
        .await?
    {
        AuthOutcome::Authenticated(principal) => {
            start_session(state, headers, &principal, success).await
        }
        AuthOutcome::Rejected => Ok(Redirect::to(failure).into_response()),
    }
}

/// Register a student and log them in
///
/// POST /student/signup
async fn student_signup(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<StudentSignupForm>,
) -> ApiResult<Response> {
    let student =
        AccountService::signup_student(state.credentials(), state.passwords(), &form).await?;
    start_session(&state, &headers, &Principal::Student(student), "/problems").await
}

/// Student login
///
/// POST /student/login
async fn student_login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> ApiResult<Response> {
    login(
        &state,
        &headers,
        IdentityProvider::Student,
        form,
        "/problems",
        "/student/signup",
    )
    .await
}

/// Register a hall admin; they then log in through their hall's path
///
/// POST /halladmin/signup
async fn hall_admin_signup(
    State(state): State<AppState>,
    Form(form): Form<HallAdminSignupForm>,
) -> ApiResult<Redirect> {
    let admin =
        AccountService::signup_hall_admin(state.credentials(), state.passwords(), &form).await?;
    Ok(Redirect::to(&hall_admin_login_path(&admin.hall)))
}

/// Hall admin login, scoped to the hall in the path
///
/// POST /halladmin/login/:hall
async fn hall_admin_login(
    State(state): State<AppState>,
    Path(hall): Path<String>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> ApiResult<Response> {
    let failure = hall_admin_login_path(&hall);
    login(
        &state,
        &headers,
        IdentityProvider::HallAdmin { hall },
        form,
        "/dashboard",
        &failure,
    )
    .await
}

/// End the session and clear the cookie
///
/// GET|POST /logout
///
/// Always succeeds; store failures are logged and the cookie is cleared anyway.
async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let token = state.sessions().token_from_headers(&headers);

    match current_principal(&headers, &state).await {
        Ok(Some(Principal::Student(student))) => {
            if let Err(err) = state
                .credentials()
                .set_student_logged_in(&student.matric_number, false)
                .await
            {
                error!("Failed to clear logged-in flag: {:?}", err);
            }
            info!(matric_number = %student.matric_number, "Student logged out");
        }
        Ok(Some(Principal::HallAdmin(admin))) => {
            info!(staff_id = %admin.staff_id, "Hall admin logged out");
        }
        Ok(None) => {}
        Err(err) => error!("Failed to resolve session on logout: {}", err),
    }

    if let Err(err) = state.sessions().end(token.as_deref()).await {
        error!("Failed to end session: {:?}", err);
    }

    match state.sessions().clear_cookie() {
        Ok(cookie) => ([(SET_COOKIE, cookie)], Redirect::to("/")).into_response(),
        Err(_) => Redirect::to("/").into_response(),
    }
}

/// Current principal, or 204 when anonymous
///
/// GET /session
async fn current_session(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Response> {
    Ok(match current_principal(&headers, &state).await? {
        Some(principal) => Json(principal.to_session_response()).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hall_admin_login_path_encodes_hall() {
        assert_eq!(hall_admin_login_path("Hall A"), "/halladmin/login/Hall%20A");
        assert_eq!(hall_admin_login_path("Queen's"), "/halladmin/login/Queen%27s");
    }
}
