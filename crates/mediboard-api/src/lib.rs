//! Mediboard API Client
//!
//! Typed access to the remote dashboard API. All business logic and
//! persistence live on the server; this crate only shapes requests and
//! responses. The `Api` and `FileUploader` traits are the seams the
//! session layer programs against, so it can be tested without a network.

mod client;
mod error;
mod models;
mod upload;

pub use client::{Api, ApiClient};
pub use error::ApiError;
pub use models::{
    Credentials, LoginResponse, Menu, MenuItem, MenuSection, NewUser, RenewResponse, Role, User,
    UserPage,
};
pub use upload::{FileUploader, HttpFileUploader};

// Callers match on `ApiError::Server { status, .. }` without depending on
// reqwest directly.
pub use reqwest::StatusCode;

pub type Result<T> = std::result::Result<T, ApiError>;
