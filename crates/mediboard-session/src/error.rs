//! Session error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Not logged in")]
    NotLoggedIn,

    #[error("API error: {0}")]
    Api(#[from] mediboard_api::ApiError),

    #[error("Storage error: {0}")]
    Storage(#[from] mediboard_storage::StorageError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// A logout or a newer login resolved while this call was in flight;
    /// its result must not clobber the current session.
    #[error("Superseded by a newer login or logout")]
    Superseded,
}
