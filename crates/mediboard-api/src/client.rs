//! HTTP API client

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use crate::models::{
    ApiErrorBody, Credentials, LoginResponse, NewUser, RenewResponse, User, UserEnvelope, UserPage,
};
use crate::{ApiError, Result};

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// The remote API collaborator. The session layer only sees this trait;
/// `ApiClient` is the reqwest-backed implementation.
#[async_trait]
pub trait Api: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse>;
    async fn login_with_google(&self, id_token: &str) -> Result<LoginResponse>;
    async fn renew_token(&self, token: &str) -> Result<RenewResponse>;
    async fn create_user(&self, user: &NewUser) -> Result<User>;
    async fn update_user(&self, token: &str, user: &User) -> Result<User>;
    async fn delete_user(&self, token: &str, id: &str) -> Result<()>;
    async fn list_users(&self, from: u32) -> Result<UserPage>;
    async fn search_users(&self, term: &str) -> Result<Vec<User>>;
}

pub struct ApiClient {
    base: String,
    http: Client,
}

impl ApiClient {
    pub fn new(base: Url) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            base: base.as_str().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

/// Parse a response, converting non-2xx statuses into the server's
/// structured error.
pub(crate) async fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        Ok(response.json().await?)
    } else {
        Err(server_error(status, response).await)
    }
}

pub(crate) async fn expect_success(response: Response) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(server_error(status, response).await)
    }
}

async fn server_error(status: StatusCode, response: Response) -> ApiError {
    let body = response.json::<ApiErrorBody>().await.ok();
    let message = body
        .as_ref()
        .map(|b| b.message.clone())
        .unwrap_or_else(|| format!("HTTP {}", status));
    let detail = body.and_then(|b| b.errors).and_then(|e| e.message);

    tracing::warn!(%status, %message, "API request failed");

    ApiError::Server {
        status,
        message,
        detail,
    }
}

#[async_trait]
impl Api for ApiClient {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        let response = self
            .http
            .post(self.endpoint("/login"))
            .json(credentials)
            .send()
            .await?;

        parse(response).await
    }

    async fn login_with_google(&self, id_token: &str) -> Result<LoginResponse> {
        let response = self
            .http
            .post(self.endpoint("/login/google"))
            .json(&serde_json::json!({ "token": id_token }))
            .send()
            .await?;

        parse(response).await
    }

    async fn renew_token(&self, token: &str) -> Result<RenewResponse> {
        let response = self
            .http
            .get(self.endpoint("/login/renuevatoken"))
            .query(&[("token", token)])
            .send()
            .await?;

        parse(response).await
    }

    async fn create_user(&self, user: &NewUser) -> Result<User> {
        let response = self
            .http
            .post(self.endpoint("/usuario"))
            .json(user)
            .send()
            .await?;

        let envelope: UserEnvelope = parse(response).await?;
        Ok(envelope.user)
    }

    async fn update_user(&self, token: &str, user: &User) -> Result<User> {
        let response = self
            .http
            .put(self.endpoint(&format!("/usuario/{}", user.id)))
            .query(&[("token", token)])
            .json(user)
            .send()
            .await?;

        let envelope: UserEnvelope = parse(response).await?;
        Ok(envelope.user)
    }

    async fn delete_user(&self, token: &str, id: &str) -> Result<()> {
        let response = self
            .http
            .delete(self.endpoint(&format!("/usuario/{}", id)))
            .query(&[("token", token)])
            .send()
            .await?;

        expect_success(response).await
    }

    async fn list_users(&self, from: u32) -> Result<UserPage> {
        let response = self
            .http
            .get(self.endpoint("/usuario"))
            .query(&[("desde", from)])
            .send()
            .await?;

        parse(response).await
    }

    async fn search_users(&self, term: &str) -> Result<Vec<User>> {
        let response = self
            .http
            .get(self.endpoint(&format!("/busqueda/coleccion/usuarios/{}", term)))
            .send()
            .await?;

        let page: UserPage = parse(response).await?;
        Ok(page.users)
    }
}
