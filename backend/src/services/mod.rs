//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories and the authentication layer.

pub mod account;
pub mod hall;
pub mod problem;

pub use account::AccountService;
pub use hall::HallService;
pub use problem::ProblemService;
