//! Session extractors
//!
//! Resolve the session cookie to a principal and re-read the account from
//! the credential store. Requests without a matching principal are
//! redirected to the login page of the identity type the route expects.

use super::identity::Principal;
use crate::error::ApiError;
use crate::repositories::{HallAdminRecord, StudentRecord};
use crate::state::AppState;
use axum::{
    extract::FromRef,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};

/// Where students without a session are sent
pub const STUDENT_LOGIN_PATH: &str = "/student/login";
/// Where hall admins without a session are sent
pub const HALL_ADMIN_SIGNUP_PATH: &str = "/halladmin/signup";

/// Rejection for routes gated on an identity type
#[derive(Debug)]
pub enum AuthRejection {
    /// No session, or a session of the other identity type
    Redirect(&'static str),
    Error(ApiError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            AuthRejection::Redirect(to) => Redirect::to(to).into_response(),
            AuthRejection::Error(err) => err.into_response(),
        }
    }
}

/// Principal for the request's session cookie, if any
pub(crate) async fn current_principal(
    headers: &axum::http::HeaderMap,
    state: &AppState,
) -> Result<Option<Principal>, ApiError> {
    let Some(token) = state.sessions().token_from_headers(headers) else {
        return Ok(None);
    };

    let session = state
        .sessions()
        .restore(&token)
        .await
        .map_err(ApiError::Internal)?;
    let Some(session_principal) = session.principal() else {
        return Ok(None);
    };

    // The account may have gone away since login
    state
        .authenticator()
        .load_principal(session_principal)
        .await
        .map_err(ApiError::Internal)
}

/// Authenticated student extracted from the session cookie
#[derive(Debug, Clone)]
pub struct AuthStudent(pub StudentRecord);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthStudent
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        match current_principal(&parts.headers, &app_state)
            .await
            .map_err(AuthRejection::Error)?
        {
            Some(Principal::Student(student)) => Ok(AuthStudent(student)),
            _ => Err(AuthRejection::Redirect(STUDENT_LOGIN_PATH)),
        }
    }
}

/// Authenticated hall admin extracted from the session cookie
#[derive(Debug, Clone)]
pub struct AuthHallAdmin(pub HallAdminRecord);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthHallAdmin
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        match current_principal(&parts.headers, &app_state)
            .await
            .map_err(AuthRejection::Error)?
        {
            Some(Principal::HallAdmin(admin)) => Ok(AuthHallAdmin(admin)),
            _ => Err(AuthRejection::Redirect(HALL_ADMIN_SIGNUP_PATH)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::LOCATION, StatusCode};

    #[test]
    fn test_redirect_rejection_is_see_other() {
        let response = AuthRejection::Redirect(STUDENT_LOGIN_PATH).into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], STUDENT_LOGIN_PATH);
    }

    #[test]
    fn test_error_rejection_uses_api_error_status() {
        let response =
            AuthRejection::Error(ApiError::Internal(anyhow::anyhow!("boom"))).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
