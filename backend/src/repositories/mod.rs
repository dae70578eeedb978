//! Database repositories
//!
//! Provides data access layer for database operations.

pub mod hall;
pub mod hall_admin;
pub mod problem;
pub mod student;

pub use hall::{HallRecord, HallRepository};
pub use hall_admin::{HallAdminRecord, HallAdminRepository, HallLink};
pub use problem::{CreateProblem, ProblemRecord, ProblemRepository};
pub use student::{StudentRecord, StudentRepository};
