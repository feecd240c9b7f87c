use crate::domain::model::UploadedFile;
use crate::domain::ports::{AccessTokenProvider, FileHost};
use crate::utils::error::{MoverError, Result};
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::{Client, Response};
use serde::Serialize;
use std::sync::Arc;
use url::Url;

const SERVICE: &str = "Drive";

/// Drive v3 client that creates files with the resumable upload protocol.
pub struct DriveHost {
    client: Client,
    tokens: Arc<dyn AccessTokenProvider>,
    endpoint: Url,
}

#[derive(Serialize)]
struct FileMetadata<'a> {
    name: &'a str,
    parents: [&'a str; 1],
}

impl DriveHost {
    pub fn new(client: Client, tokens: Arc<dyn AccessTokenProvider>, endpoint: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint).map_err(|e| MoverError::ConfigError {
            message: format!("Invalid upload endpoint {}: {}", endpoint, e),
        })?;
        Ok(Self {
            client,
            tokens,
            endpoint,
        })
    }

    fn files_url(&self) -> Result<Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| MoverError::ConfigError {
                message: format!("Upload endpoint cannot be a base URL: {}", self.endpoint),
            })?
            .pop_if_empty()
            .extend(["upload", "drive", "v3", "files"]);
        url.query_pairs_mut()
            .append_pair("uploadType", "resumable")
            .append_pair("supportsAllDrives", "true")
            .append_pair("fields", "id,name");
        Ok(url)
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(MoverError::api(SERVICE, status.as_u16(), body))
    }

    /// Opens an upload session and returns its URI.
    async fn start_session(
        &self,
        token: &str,
        metadata: &FileMetadata<'_>,
        content_type: &str,
        length: usize,
    ) -> Result<String> {
        let response = self
            .client
            .post(self.files_url()?)
            .bearer_auth(token)
            .header("X-Upload-Content-Type", content_type)
            .header("X-Upload-Content-Length", length.to_string())
            .json(metadata)
            .send()
            .await?;
        let response = Self::check(response).await?;

        response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                MoverError::api(
                    SERVICE,
                    response.status().as_u16(),
                    "resumable upload response has no Location header",
                )
            })
    }
}

#[async_trait]
impl FileHost for DriveHost {
    async fn upload(
        &self,
        name: &str,
        folder_id: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<UploadedFile> {
        let token = self.tokens.access_token().await?;
        let metadata = FileMetadata {
            name,
            parents: [folder_id],
        };

        let session = self
            .start_session(&token, &metadata, content_type, data.len())
            .await?;
        tracing::debug!("Opened Drive upload session for {} ({} bytes)", name, data.len());

        let response = self
            .client
            .put(&session)
            .bearer_auth(&token)
            .header(CONTENT_TYPE, content_type)
            .body(data)
            .send()
            .await?;
        let file: UploadedFile = Self::check(response).await?.json().await?;

        tracing::debug!("Created Drive file {} ({}) in folder {}", file.name, file.id, folder_id);
        Ok(file)
    }
}
