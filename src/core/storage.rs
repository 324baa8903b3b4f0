//! Document records and blob storage.
//!
//! Records and blobs live in separate stores like the hosted services they
//! stand in for. Both are keyed under `users/{uid}/documents`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::api::StoreError;

/// Blob writes are split into chunks of this size so progress can be reported.
pub const UPLOAD_CHUNK: usize = 64 * 1024;

/// Metadata of an uploaded document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedDocument {
    pub id: String,
    pub user_id: String,
    pub filename: String,
    pub content_type: String,
    pub file_size: u64,
    pub storage_path: String,
    #[serde(rename = "downloadURL")]
    pub download_url: String,
    pub upload_date: DateTime<Utc>,
}

/// A record about to be created; the store assigns id and upload date.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub user_id: String,
    pub filename: String,
    pub content_type: String,
    pub file_size: u64,
    pub storage_path: String,
    pub download_url: String,
}

impl NewDocument {
    pub(crate) fn into_record(self) -> UploadedDocument {
        UploadedDocument {
            id: Uuid::new_v4().to_string(),
            user_id: self.user_id,
            filename: self.filename,
            content_type: self.content_type,
            file_size: self.file_size,
            storage_path: self.storage_path,
            download_url: self.download_url,
            upload_date: Utc::now(),
        }
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn create(&self, document: NewDocument) -> Result<UploadedDocument, StoreError>;

    /// The user's documents, newest first.
    async fn list(&self, user_id: &str) -> Result<Vec<UploadedDocument>, StoreError>;

    async fn get(&self, user_id: &str, id: &str) -> Result<UploadedDocument, StoreError>;

    async fn delete(&self, user_id: &str, id: &str) -> Result<(), StoreError>;
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores `bytes` at `path` and returns a download reference.
    /// `progress` receives the written fraction, ending at 1.0.
    async fn upload(
        &self,
        path: &str,
        bytes: &[u8],
        progress: &(dyn Fn(f32) + Send + Sync),
    ) -> Result<String, StoreError>;

    async fn read(&self, path: &str) -> Result<Vec<u8>, StoreError>;

    async fn delete(&self, path: &str) -> Result<(), StoreError>;
}

/// Rejects absolute paths and any `..` or `.` component.
pub(crate) fn check_path(path: &str) -> Result<PathBuf, StoreError> {
    let invalid = || StoreError::InvalidPath(path.to_string());
    if path.is_empty() || path.contains('\\') {
        return Err(invalid());
    }
    let relative = Path::new(path);
    if !relative
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
    {
        return Err(invalid());
    }
    Ok(relative.to_path_buf())
}

/// A single path component such as a user id or record id.
pub(crate) fn check_segment(segment: &str) -> Result<&str, StoreError> {
    if segment.is_empty() || segment.contains(['/', '\\']) || segment == "." || segment == ".." {
        return Err(StoreError::InvalidPath(segment.to_string()));
    }
    Ok(segment)
}

pub(crate) fn newest_first(documents: &mut [UploadedDocument]) {
    documents.sort_by(|a, b| b.upload_date.cmp(&a.upload_date));
}

fn not_found(err: std::io::Error, what: &str) -> StoreError {
    if err.kind() == ErrorKind::NotFound {
        StoreError::NotFound(what.to_string())
    } else {
        StoreError::Io(err)
    }
}

/// JSON records at `{root}/users/{uid}/documents/{id}.json`.
pub struct FsDocumentStore {
    root: PathBuf,
}

impl FsDocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn user_dir(&self, user_id: &str) -> Result<PathBuf, StoreError> {
        Ok(self
            .root
            .join("users")
            .join(check_segment(user_id)?)
            .join("documents"))
    }

    fn record_path(&self, user_id: &str, id: &str) -> Result<PathBuf, StoreError> {
        Ok(self
            .user_dir(user_id)?
            .join(format!("{}.json", check_segment(id)?)))
    }
}

#[async_trait]
impl DocumentStore for FsDocumentStore {
    async fn create(&self, document: NewDocument) -> Result<UploadedDocument, StoreError> {
        let record = document.into_record();
        let dir = self.user_dir(&record.user_id)?;
        fs::create_dir_all(&dir).await?;
        let json = serde_json::to_vec_pretty(&record)?;
        fs::write(dir.join(format!("{}.json", record.id)), json).await?;
        Ok(record)
    }

    async fn list(&self, user_id: &str) -> Result<Vec<UploadedDocument>, StoreError> {
        let dir = self.user_dir(user_id)?;
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut documents = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let bytes = fs::read(&path).await?;
            documents.push(serde_json::from_slice(&bytes)?);
        }
        newest_first(&mut documents);
        Ok(documents)
    }

    async fn get(&self, user_id: &str, id: &str) -> Result<UploadedDocument, StoreError> {
        let bytes = fs::read(self.record_path(user_id, id)?)
            .await
            .map_err(|e| not_found(e, id))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn delete(&self, user_id: &str, id: &str) -> Result<(), StoreError> {
        fs::remove_file(self.record_path(user_id, id)?)
            .await
            .map_err(|e| not_found(e, id))
    }
}

/// Raw blobs under a root directory, referenced by `file://` URLs.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, StoreError> {
        Ok(self.root.join(check_path(path)?))
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn upload(
        &self,
        path: &str,
        bytes: &[u8],
        progress: &(dyn Fn(f32) + Send + Sync),
    ) -> Result<String, StoreError> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => StoreError::AlreadyExists(path.to_string()),
                _ => StoreError::Io(e),
            })?;
        let total = bytes.len();
        let mut written = 0;
        for chunk in bytes.chunks(UPLOAD_CHUNK) {
            file.write_all(chunk).await?;
            written += chunk.len();
            progress(written as f32 / total as f32);
        }
        file.flush().await?;
        if total == 0 {
            progress(1.0);
        }

        Ok(format!("file://{}", target.display()))
    }

    async fn read(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        fs::read(self.resolve(path)?)
            .await
            .map_err(|e| not_found(e, path))
    }

    async fn delete(&self, path: &str) -> Result<(), StoreError> {
        fs::remove_file(self.resolve(path)?)
            .await
            .map_err(|e| not_found(e, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_must_stay_relative() {
        assert!(check_path("users/u1/documents/1_a.txt").is_ok());
        assert!(check_path("/etc/passwd").is_err());
        assert!(check_path("users/../../secret").is_err());
        assert!(check_path("users/./a").is_err());
        assert!(check_path("").is_err());
    }

    #[test]
    fn segments_are_single_components() {
        assert!(check_segment("local").is_ok());
        assert!(check_segment("a/b").is_err());
        assert!(check_segment("..").is_err());
    }

    #[test]
    fn record_serializes_with_camel_case_keys() {
        let record = NewDocument {
            user_id: "u1".to_string(),
            filename: "lease.txt".to_string(),
            content_type: "text/plain".to_string(),
            file_size: 3,
            storage_path: "users/u1/documents/1_lease.txt".to_string(),
            download_url: "memory://users/u1/documents/1_lease.txt".to_string(),
        }
        .into_record();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["downloadURL"], "memory://users/u1/documents/1_lease.txt");
        assert!(json["uploadDate"].is_string());
    }
}
