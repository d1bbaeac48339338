//! Mediboard Storage Layer
//!
//! SQLite-backed key-value persistence for client state (session token,
//! logged-in user, sidebar menu, remembered email). Values are strings;
//! structured values are stored as JSON by the layers above.

mod database;
mod error;
mod migrations;

pub use database::Database;
pub use error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;
