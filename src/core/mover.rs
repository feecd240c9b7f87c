use crate::core::{FileHost, ObjectStore, RelocationRule, Result};
use chrono::{DateTime, Utc};

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Applies one relocation rule: every due object under the rule's prefix is
/// downloaded, uploaded to the rule's folder, then deleted from the bucket.
pub struct Mover<S: ObjectStore, H: FileHost> {
    store: S,
    host: H,
}

impl<S: ObjectStore, H: FileHost> Mover<S, H> {
    pub fn new(store: S, host: H) -> Self {
        Self { store, host }
    }

    /// Returns the number of objects moved. The first failing step aborts the
    /// rule; objects moved before it stay moved.
    pub async fn relocate(&self, rule: &RelocationRule, now: DateTime<Utc>) -> Result<usize> {
        let objects = self.store.list(&rule.prefix).await?;
        tracing::debug!(
            "Rule {}: {} object(s) under {}",
            rule.name,
            objects.len(),
            rule.prefix
        );

        let mut moved = 0;
        for object in objects {
            if !rule.is_due(object.time_created, now) {
                continue;
            }

            let name = object.basename();
            if name.is_empty() {
                tracing::debug!("Skipping folder placeholder {}", object.name);
                continue;
            }

            let data = self.store.download(&object).await?;
            let content_type = object
                .content_type
                .as_deref()
                .unwrap_or(DEFAULT_CONTENT_TYPE);

            let file = self
                .host
                .upload(name, &rule.folder_id, content_type, data)
                .await?;
            self.store.delete(&object).await?;
            moved += 1;

            tracing::info!(
                "📦 Moved {} ({} bytes) to Drive file {}",
                object.name,
                object.size,
                file.id
            );
        }

        Ok(moved)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::core::{FileHost, ObjectStore, Result, StoredObject, UploadedFile};
    use crate::utils::error::MoverError;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    pub struct MemoryStore {
        objects: Arc<Mutex<BTreeMap<String, (StoredObject, Vec<u8>)>>>,
        fail_listing: Arc<Mutex<Option<String>>>,
        fail_delete: Arc<Mutex<Option<String>>>,
        downloads: Arc<Mutex<Vec<String>>>,
    }

    impl MemoryStore {
        pub fn put(&self, name: &str, created: DateTime<Utc>, data: &[u8]) {
            let object = StoredObject {
                name: name.to_string(),
                time_created: created,
                size: data.len() as u64,
                content_type: None,
                generation: Some(1),
            };
            self.objects
                .lock()
                .unwrap()
                .insert(name.to_string(), (object, data.to_vec()));
        }

        pub fn names(&self) -> Vec<String> {
            self.objects.lock().unwrap().keys().cloned().collect()
        }

        pub fn downloads(&self) -> Vec<String> {
            self.downloads.lock().unwrap().clone()
        }

        pub fn fail_listing_of(&self, prefix: &str) {
            *self.fail_listing.lock().unwrap() = Some(prefix.to_string());
        }

        pub fn fail_delete_of(&self, name: &str) {
            *self.fail_delete.lock().unwrap() = Some(name.to_string());
        }
    }

    #[async_trait]
    impl ObjectStore for MemoryStore {
        async fn list(&self, prefix: &str) -> Result<Vec<StoredObject>> {
            if self.fail_listing.lock().unwrap().as_deref() == Some(prefix) {
                return Err(MoverError::api("Cloud Storage", 503, "backend unavailable"));
            }
            Ok(self
                .objects
                .lock()
                .unwrap()
                .values()
                .filter(|(o, _)| o.name.starts_with(prefix))
                .map(|(o, _)| o.clone())
                .collect())
        }

        async fn download(&self, object: &StoredObject) -> Result<Vec<u8>> {
            self.downloads.lock().unwrap().push(object.name.clone());
            self.objects
                .lock()
                .unwrap()
                .get(&object.name)
                .map(|(_, data)| data.clone())
                .ok_or_else(|| MoverError::api("Cloud Storage", 404, "No such object"))
        }

        async fn delete(&self, object: &StoredObject) -> Result<()> {
            if self.fail_delete.lock().unwrap().as_deref() == Some(object.name.as_str()) {
                return Err(MoverError::api("Cloud Storage", 412, "conditionNotMet"));
            }
            self.objects.lock().unwrap().remove(&object.name);
            Ok(())
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Upload {
        pub name: String,
        pub folder_id: String,
        pub content_type: String,
        pub data: Vec<u8>,
    }

    #[derive(Clone, Default)]
    pub struct MemoryHost {
        uploads: Arc<Mutex<Vec<Upload>>>,
        reject: Arc<Mutex<Option<String>>>,
    }

    impl MemoryHost {
        pub fn uploads(&self) -> Vec<Upload> {
            self.uploads.lock().unwrap().clone()
        }

        pub fn reject(&self, name: &str) {
            *self.reject.lock().unwrap() = Some(name.to_string());
        }
    }

    #[async_trait]
    impl FileHost for MemoryHost {
        async fn upload(
            &self,
            name: &str,
            folder_id: &str,
            content_type: &str,
            data: Vec<u8>,
        ) -> Result<UploadedFile> {
            if self.reject.lock().unwrap().as_deref() == Some(name) {
                return Err(MoverError::api("Drive", 403, "insufficientFilePermissions"));
            }
            let mut uploads = self.uploads.lock().unwrap();
            uploads.push(Upload {
                name: name.to_string(),
                folder_id: folder_id.to_string(),
                content_type: content_type.to_string(),
                data,
            });
            Ok(UploadedFile {
                id: format!("drive-{}", uploads.len()),
                name: name.to_string(),
            })
        }
    }
}
