//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] mediboard_storage::StorageError),

    #[error("API error: {0}")]
    Api(#[from] mediboard_api::ApiError),

    #[error("Session error: {0}")]
    Session(#[from] mediboard_session::SessionError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
