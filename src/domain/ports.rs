use crate::domain::model::{StoredObject, UploadedFile};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Supplies OAuth bearer tokens to the HTTP adapters.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String>;
}

/// The bucket files are moved out of.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn list(&self, prefix: &str) -> Result<Vec<StoredObject>>;
    async fn download(&self, object: &StoredObject) -> Result<Vec<u8>>;
    async fn delete(&self, object: &StoredObject) -> Result<()>;
}

/// The hosting service files are moved into.
#[async_trait]
pub trait FileHost: Send + Sync {
    async fn upload(
        &self,
        name: &str,
        folder_id: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<UploadedFile>;
}
