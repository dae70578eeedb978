//! API request and response types
//!
//! Form types accept the field names posted by the original HTML forms
//! (`fname`, `matno`, `staffid`, `desc`, ...) as aliases.

use crate::models::{Hall, HallAdmin, PrincipalKind, Problem};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Student signup form
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StudentSignupForm {
    #[serde(alias = "fname")]
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: String,
    #[serde(alias = "matno")]
    #[validate(length(min = 1, max = 64, message = "Matriculation number must be 1-64 characters"))]
    pub matric_number: String,
    #[validate(custom(function = "crate::validation::password_field"))]
    pub password: String,
}

/// Hall admin signup form
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct HallAdminSignupForm {
    #[serde(alias = "fullname")]
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: String,
    #[serde(alias = "staffid")]
    #[validate(length(min = 1, max = 64, message = "Staff ID must be 1-64 characters"))]
    pub staff_id: String,
    #[validate(length(min = 1, max = 120, message = "Hall must be 1-120 characters"))]
    pub hall: String,
    #[validate(custom(function = "crate::validation::password_field"))]
    pub password: String,
}

/// Login form shared by both identity types
///
/// `username` carries the matriculation number or the staff ID.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, max = 64, message = "Username is required"))]
    pub username: String,
    #[validate(custom(function = "crate::validation::password_field"))]
    pub password: String,
}

/// Problem submission form
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProblemForm {
    #[validate(length(min = 1, max = 120, message = "Hall is required"))]
    pub hall: String,
    #[validate(length(min = 1, max = 32, message = "Room must be 1-32 characters"))]
    pub room: String,
    #[validate(length(min = 1, max = 64, message = "Category must be 1-64 characters"))]
    pub category: String,
    #[serde(alias = "desc")]
    #[validate(length(min = 1, max = 2000, message = "Description must be 1-2000 characters"))]
    pub description: String,
}

/// Current session as seen by the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub kind: PrincipalKind,
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hall: Option<String>,
}

/// Hall admin dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub admin: HallAdmin,
    pub halls: Vec<Hall>,
}

/// Problems for a single hall
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HallProblemsResponse {
    pub hall: String,
    pub problems: Vec<Problem>,
}
