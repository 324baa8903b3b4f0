//! A user's document collection: blobs plus their metadata records.

use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use super::data_uri::DataUri;
use super::memory::{MemoryBlobStore, MemoryDocumentStore};
use super::storage::{
    check_segment, BlobStore, DocumentStore, FsBlobStore, FsDocumentStore, NewDocument,
    UploadedDocument,
};
use super::utils::{content_type_for, sanitize_filename};
use crate::api::StoreError;

#[derive(Clone)]
pub struct DocumentLibrary {
    user_id: String,
    documents: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
}

impl DocumentLibrary {
    pub fn new(
        user_id: impl Into<String>,
        documents: Arc<dyn DocumentStore>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            documents,
            blobs,
        }
    }

    pub fn in_memory(user_id: impl Into<String>) -> Self {
        Self::new(
            user_id,
            Arc::new(MemoryDocumentStore::new()),
            Arc::new(MemoryBlobStore::new()),
        )
    }

    /// Records under `{root}/records`, blobs under `{root}/blobs`.
    pub fn on_disk(user_id: impl Into<String>, root: &Path) -> Self {
        Self::new(
            user_id,
            Arc::new(FsDocumentStore::new(root.join("records"))),
            Arc::new(FsBlobStore::new(root.join("blobs"))),
        )
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Stores the blob at `users/{uid}/documents/{millis}_{key}_{filename}`,
    /// then creates its record. The random key keeps uploads of the same name
    /// within one millisecond apart. A blob whose record cannot be created is
    /// removed.
    pub async fn upload(
        &self,
        filename: &str,
        bytes: &[u8],
        progress: &(dyn Fn(f32) + Send + Sync),
    ) -> Result<UploadedDocument, StoreError> {
        let user_id = check_segment(&self.user_id)?;
        let filename = sanitize_filename(filename)
            .ok_or_else(|| StoreError::InvalidPath(filename.to_string()))?;
        let storage_path = format!(
            "users/{}/documents/{}_{}_{}",
            user_id,
            Utc::now().timestamp_millis(),
            Uuid::new_v4().simple(),
            filename
        );

        let download_url = self.blobs.upload(&storage_path, bytes, progress).await?;

        let new = NewDocument {
            user_id: user_id.to_string(),
            content_type: content_type_for(&filename).to_string(),
            filename,
            file_size: bytes.len() as u64,
            storage_path: storage_path.clone(),
            download_url,
        };
        match self.documents.create(new).await {
            Ok(record) => {
                info!(id = %record.id, path = %record.storage_path, size = record.file_size, "document uploaded");
                Ok(record)
            }
            Err(e) => {
                if let Err(cleanup) = self.blobs.delete(&storage_path).await {
                    warn!(path = %storage_path, error = %cleanup, "failed to remove orphaned blob");
                }
                Err(e)
            }
        }
    }

    pub async fn list(&self) -> Result<Vec<UploadedDocument>, StoreError> {
        self.documents.list(&self.user_id).await
    }

    pub async fn get(&self, id: &str) -> Result<UploadedDocument, StoreError> {
        self.documents.get(&self.user_id, id).await
    }

    /// Removes the blob first, then the record. A blob that is already gone
    /// does not keep the record alive.
    pub async fn delete(&self, id: &str) -> Result<UploadedDocument, StoreError> {
        let record = self.get(id).await?;
        match self.blobs.delete(&record.storage_path).await {
            Ok(()) => {}
            Err(StoreError::NotFound(path)) => {
                warn!(id, path = %path, "blob already missing, deleting record");
            }
            Err(e) => return Err(e),
        }
        self.documents.delete(&self.user_id, id).await?;
        info!(id, "document deleted");
        Ok(record)
    }

    pub async fn load_bytes(&self, id: &str) -> Result<(UploadedDocument, Vec<u8>), StoreError> {
        let record = self.get(id).await?;
        let bytes = self.blobs.read(&record.storage_path).await?;
        Ok((record, bytes))
    }

    /// The document content as UTF-8 text.
    pub async fn load_text(&self, id: &str) -> Result<String, StoreError> {
        let (record, bytes) = self.load_bytes(id).await?;
        String::from_utf8(bytes).map_err(|_| StoreError::NotText(record.filename))
    }

    /// The document as a `data:` URI carrying its stored content type.
    pub async fn data_uri(&self, id: &str) -> Result<String, StoreError> {
        let (record, bytes) = self.load_bytes(id).await?;
        Ok(DataUri::new(record.content_type, bytes).to_string())
    }
}
