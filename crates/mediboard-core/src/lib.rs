//! Mediboard Core
//!
//! Central coordination layer for the dashboard client: configuration,
//! wiring of storage / API / session, and the presentation policy that
//! turns session results into notifications and redirects.

mod config;
mod dashboard;
mod error;
mod notify;

pub use config::{default_menu, Config};
pub use dashboard::Dashboard;
pub use error::CoreError;
pub use notify::{Navigator, Notification, Notifier, Route, Severity};

// Re-export the layers below
pub use mediboard_api::{
    Api, ApiClient, ApiError, Credentials, FileUploader, HttpFileUploader, Menu, MenuItem,
    MenuSection, NewUser, Role, User, UserPage,
};
pub use mediboard_session::{Session, SessionError, SessionManager};
pub use mediboard_storage::{Database, StorageError};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
