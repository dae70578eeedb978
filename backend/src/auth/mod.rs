//! Authentication module
//!
//! Provides bcrypt password hashing, the student and hall admin identity
//! providers, and cookie-based server-side sessions.

mod error;
mod identity;
mod middleware;
mod password;
mod session;
mod store;

pub use error::AuthError;
pub use identity::{AuthOutcome, Authenticator, IdentityProvider, Principal};
pub(crate) use middleware::current_principal;
pub use middleware::{
    AuthHallAdmin, AuthRejection, AuthStudent, HALL_ADMIN_SIGNUP_PATH, STUDENT_LOGIN_PATH,
};
pub use password::{PasswordError, PasswordService};
pub use session::{
    MemorySessionStore, RedisSessionStore, SessionManager, SessionPrincipal, SessionState,
    SessionStore,
};
pub use store::{
    CredentialStore, MemoryCredentialStore, NewHallAdmin, NewStudent, PgCredentialStore,
    StoreError,
};
