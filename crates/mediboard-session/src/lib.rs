//! Mediboard Session Management
//!
//! Owns the session lifecycle for the authenticated principal:
//! - login (local credentials or federated Google token)
//! - token renewal
//! - durable persistence across restarts
//! - user CRUD passthrough with session refresh for the logged-in user
//!
//! API failures surface as `Err` values; presenting them to the user
//! (modal, redirect) is the caller's concern.

mod error;
mod manager;
mod session;

pub use error::SessionError;
pub use manager::SessionManager;
pub use session::Session;

pub type Result<T> = std::result::Result<T, SessionError>;
