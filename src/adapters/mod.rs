// Adapters layer: HTTP clients for the token endpoint, Cloud Storage and Drive.

pub mod auth;
pub mod drive;
pub mod gcs;

use crate::config::HttpConfig;
use crate::domain::ports::AccessTokenProvider;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub use auth::{ServiceAccountKey, ServiceAccountTokenProvider};
pub use drive::DriveHost;
pub use gcs::GcsStore;

pub fn http_client(config: &HttpConfig) -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// A fixed bearer token, for emulators and tests.
#[derive(Debug, Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl AccessTokenProvider for StaticToken {
    async fn access_token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}
