//! In-process stores, used by tests and whenever nothing should touch disk.

use async_trait::async_trait;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::storage::{
    check_path, check_segment, newest_first, BlobStore, DocumentStore, NewDocument,
    UploadedDocument, UPLOAD_CHUNK,
};
use crate::api::StoreError;

#[derive(Default)]
pub struct MemoryDocumentStore {
    records: RwLock<HashMap<String, Vec<UploadedDocument>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn create(&self, document: NewDocument) -> Result<UploadedDocument, StoreError> {
        check_segment(&document.user_id)?;
        let record = document.into_record();
        self.records
            .write()
            .await
            .entry(record.user_id.clone())
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn list(&self, user_id: &str) -> Result<Vec<UploadedDocument>, StoreError> {
        let mut documents = self
            .records
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default();
        newest_first(&mut documents);
        Ok(documents)
    }

    async fn get(&self, user_id: &str, id: &str) -> Result<UploadedDocument, StoreError> {
        self.records
            .read()
            .await
            .get(user_id)
            .and_then(|docs| docs.iter().find(|d| d.id == id).cloned())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn delete(&self, user_id: &str, id: &str) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        let docs = records
            .get_mut(user_id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let before = docs.len();
        docs.retain(|d| d.id != id);
        if docs.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn upload(
        &self,
        path: &str,
        bytes: &[u8],
        progress: &(dyn Fn(f32) + Send + Sync),
    ) -> Result<String, StoreError> {
        check_path(path)?;
        if self.blobs.read().await.contains_key(path) {
            return Err(StoreError::AlreadyExists(path.to_string()));
        }
        let mut buffer = Vec::with_capacity(bytes.len());
        for chunk in bytes.chunks(UPLOAD_CHUNK) {
            buffer.extend_from_slice(chunk);
            progress(buffer.len() as f32 / bytes.len() as f32);
        }
        if bytes.is_empty() {
            progress(1.0);
        }
        match self.blobs.write().await.entry(path.to_string()) {
            Entry::Occupied(_) => Err(StoreError::AlreadyExists(path.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(buffer);
                Ok(format!("memory://{}", path))
            }
        }
    }

    async fn read(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        self.blobs
            .read()
            .await
            .get(path)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(path.to_string()))
    }

    async fn delete(&self, path: &str) -> Result<(), StoreError> {
        self.blobs
            .write()
            .await
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(path.to_string()))
    }
}
