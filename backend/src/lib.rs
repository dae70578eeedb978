//! Hall Complaints Backend Library
//!
//! Students report problems in their hall of residence; hall admins review
//! the problems reported in the hall they administer. This library exposes
//! the backend modules for use in tests and the server binary.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
