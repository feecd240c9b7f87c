use crate::domain::model::StoredObject;
use crate::domain::ports::{AccessTokenProvider, ObjectStore};
use crate::utils::error::{MoverError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response};
use serde::Deserialize;
use std::sync::Arc;
use url::Url;

const SERVICE: &str = "Cloud Storage";

/// Cloud Storage JSON API client bound to one bucket.
pub struct GcsStore {
    client: Client,
    tokens: Arc<dyn AccessTokenProvider>,
    endpoint: Url,
    bucket: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectList {
    #[serde(default)]
    items: Vec<ObjectResource>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectResource {
    name: String,
    time_created: DateTime<Utc>,
    // int64 fields arrive as JSON strings
    #[serde(default)]
    size: Option<String>,
    #[serde(default)]
    content_type: Option<String>,
    #[serde(default)]
    generation: Option<String>,
}

impl TryFrom<ObjectResource> for StoredObject {
    type Error = MoverError;

    fn try_from(resource: ObjectResource) -> Result<Self> {
        let size = parse_int64("size", resource.size.as_deref())?.unwrap_or(0);
        let generation = parse_int64("generation", resource.generation.as_deref())?;
        Ok(StoredObject {
            name: resource.name,
            time_created: resource.time_created,
            size: u64::try_from(size).unwrap_or(0),
            content_type: resource.content_type,
            generation,
        })
    }
}

fn parse_int64(field: &str, value: Option<&str>) -> Result<Option<i64>> {
    value
        .map(|v| {
            v.parse::<i64>().map_err(|_| {
                MoverError::api(SERVICE, 200, format!("object {} is not an integer: {}", field, v))
            })
        })
        .transpose()
}

impl GcsStore {
    pub fn new(
        client: Client,
        tokens: Arc<dyn AccessTokenProvider>,
        endpoint: &str,
        bucket: impl Into<String>,
    ) -> Result<Self> {
        let endpoint = Url::parse(endpoint).map_err(|e| MoverError::ConfigError {
            message: format!("Invalid storage endpoint {}: {}", endpoint, e),
        })?;
        Ok(Self {
            client,
            tokens,
            endpoint,
            bucket: bucket.into(),
        })
    }

    /// `{endpoint}/storage/v1/b/{bucket}/o[/{object}]`, each part encoded as one segment.
    fn objects_url(&self, object: Option<&str>) -> Result<Url> {
        let mut url = self.endpoint.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| MoverError::ConfigError {
                message: format!("Storage endpoint cannot be a base URL: {}", self.endpoint),
            })?;
            segments
                .pop_if_empty()
                .extend(["storage", "v1", "b", self.bucket.as_str(), "o"]);
            if let Some(name) = object {
                segments.push(name);
            }
        }
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
}

#[async_trait]
impl ObjectStore for GcsStore {
    async fn list(&self, prefix: &str) -> Result<Vec<StoredObject>> {
        let url = self.objects_url(None)?;
        let mut objects = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let token = self.tokens.access_token().await?;
            let mut request = self
                .client
                .get(url.clone())
                .bearer_auth(token)
                .query(&[("prefix", prefix)]);
            if let Some(page) = &page_token {
                request = request.query(&[("pageToken", page.as_str())]);
            }

            tracing::debug!("Listing gs://{}/{} (page token: {:?})", self.bucket, prefix, page_token);
            let response = Self::check(request.send().await?).await?;
            let page: ObjectList = response.json().await?;

            for resource in page.items {
                objects.push(StoredObject::try_from(resource)?);
            }

            match page.next_page_token {
                Some(next) if !next.is_empty() => page_token = Some(next),
                _ => break,
            }
        }

        tracing::debug!("Found {} object(s) under gs://{}/{}", objects.len(), self.bucket, prefix);
        Ok(objects)
    }

    async fn download(&self, object: &StoredObject) -> Result<Vec<u8>> {
        let url = self.objects_url(Some(&object.name))?;
        let token = self.tokens.access_token().await?;

        let mut request = self
            .client
            .get(url)
            .bearer_auth(token)
            .query(&[("alt", "media")]);
        if let Some(generation) = object.generation {
            request = request.query(&[("generation", generation.to_string())]);
        }

        let response = Self::check(request.send().await?).await?;
        let bytes = response.bytes().await?;
        tracing::debug!("Downloaded gs://{}/{} ({} bytes)", self.bucket, object.name, bytes.len());
        Ok(bytes.to_vec())
    }

    async fn delete(&self, object: &StoredObject) -> Result<()> {
        let url = self.objects_url(Some(&object.name))?;
        let token = self.tokens.access_token().await?;

        let mut request = self.client.delete(url).bearer_auth(token);
        if let Some(generation) = object.generation {
            request = request.query(&[("ifGenerationMatch", generation.to_string())]);
        }

        Self::check(request.send().await?).await?;
        tracing::debug!("Deleted gs://{}/{}", self.bucket, object.name);
        Ok(())
    }
}
