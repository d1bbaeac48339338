//! File upload collaborator
//!
//! Binary uploads go through a dedicated endpoint (`PUT /upload/:type/:id`,
//! multipart field `imagen`) and resolve with the updated user record.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::client::parse;
use crate::models::{User, UserEnvelope};
use crate::Result;

const UPLOAD_TIMEOUT_SECS: u64 = 120;

#[async_trait]
pub trait FileUploader: Send + Sync {
    /// Upload a profile image for `user_id`, returning the updated record.
    async fn upload_user_image(&self, file: &Path, user_id: &str) -> Result<User>;
}

pub struct HttpFileUploader {
    base: String,
    http: Client,
}

impl HttpFileUploader {
    pub fn new(base: Url) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(UPLOAD_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            base: base.as_str().trim_end_matches('/').to_string(),
            http,
        })
    }
}

#[async_trait]
impl FileUploader for HttpFileUploader {
    async fn upload_user_image(&self, file: &Path, user_id: &str) -> Result<User> {
        let file_name = best_effort_file_name(file);
        let bytes = tokio::fs::read(file).await?;

        let form = Form::new().part("imagen", Part::bytes(bytes).file_name(file_name));

        let response = self
            .http
            .put(format!("{}/upload/usuarios/{}", self.base, user_id))
            .multipart(form)
            .send()
            .await?;

        let envelope: UserEnvelope = parse(response).await?;

        tracing::info!(user_id = %user_id, "Uploaded profile image");

        Ok(envelope.user)
    }
}

fn best_effort_file_name(file: &Path) -> String {
    file.file_name()
        .and_then(|name| name.to_str())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or("imagen")
        .to_string()
}
