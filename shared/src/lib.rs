//! Hall Complaints Shared Library
//!
//! This crate contains the domain models, form types, and validation
//! helpers shared by the backend and its tests.

pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use models::{Hall, HallAdmin, PrincipalKind, Problem, Student};
pub use types::*;
