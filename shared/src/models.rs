//! Data models for the Hall Complaints application

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Which credential store an authenticated principal came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PrincipalKind {
    Student,
    HallAdmin,
}

impl PrincipalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrincipalKind::Student => "student",
            PrincipalKind::HallAdmin => "hall_admin",
        }
    }
}

impl fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Student account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Student {
    pub matric_number: String,
    pub name: String,
    pub logged_in: bool,
}

/// Hall administrator account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HallAdmin {
    pub staff_id: String,
    pub name: String,
    /// Fixed at signup
    pub hall: String,
}

/// Residence hall, the tenant unit for admins and problems
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Hall {
    pub name: String,
    pub admin_id: Option<String>,
}

/// A submitted facility problem
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    pub id: Uuid,
    pub hall: String,
    pub room: String,
    pub category: String,
    pub description: String,
    pub date_submitted: DateTime<Utc>,
    pub student_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_principal_kind_serializes_snake_case() {
        let json = serde_json::to_string(&PrincipalKind::HallAdmin).unwrap();
        assert_eq!(json, "\"hall_admin\"");

        let kind: PrincipalKind = serde_json::from_str("\"student\"").unwrap();
        assert_eq!(kind, PrincipalKind::Student);
    }

    #[test]
    fn test_principal_kind_display_matches_serde() {
        assert_eq!(PrincipalKind::Student.to_string(), "student");
        assert_eq!(PrincipalKind::HallAdmin.to_string(), "hall_admin");
    }
}
