use async_trait::async_trait;
use nyaya_gpt::core::data_uri::DataUri;
use nyaya_gpt::core::memory::{MemoryBlobStore, MemoryDocumentStore};
use nyaya_gpt::core::storage::{
    BlobStore, DocumentStore, FsBlobStore, NewDocument, UploadedDocument,
};
use nyaya_gpt::{DocumentLibrary, StoreError};
use std::sync::{Arc, Mutex};

fn recorder() -> (Arc<Mutex<Vec<f32>>>, impl Fn(f32) + Send + Sync) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    (seen, move |p: f32| sink.lock().unwrap().push(p))
}

async fn exercise(library: DocumentLibrary) {
    let (seen, progress) = recorder();
    let record = library
        .upload("../contracts/lease.txt", b"The lessee shall pay rent monthly.", &progress)
        .await
        .unwrap();

    assert_eq!(record.filename, "lease.txt");
    assert_eq!(record.content_type, "text/plain");
    assert_eq!(record.file_size, 34);
    assert_eq!(record.user_id, "advocate-1");
    assert!(record.storage_path.starts_with("users/advocate-1/documents/"));
    assert!(record.storage_path.ends_with("_lease.txt"));
    assert_eq!(seen.lock().unwrap().last().copied(), Some(1.0));

    let listed = library.list().await.unwrap();
    assert_eq!(listed, vec![record.clone()]);

    assert_eq!(
        library.load_text(&record.id).await.unwrap(),
        "The lessee shall pay rent monthly."
    );
    let uri: DataUri = library.data_uri(&record.id).await.unwrap().parse().unwrap();
    assert_eq!(uri.mime, "text/plain");
    assert_eq!(uri.text().as_deref(), Some("The lessee shall pay rent monthly."));

    let deleted = library.delete(&record.id).await.unwrap();
    assert_eq!(deleted.id, record.id);
    assert!(library.list().await.unwrap().is_empty());
    assert!(matches!(
        library.delete(&record.id).await,
        Err(StoreError::NotFound(_))
    ));
}

#[tokio::test]
async fn memory_library_lifecycle() {
    exercise(DocumentLibrary::in_memory("advocate-1")).await;
}

#[tokio::test]
async fn filesystem_library_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    exercise(DocumentLibrary::on_disk("advocate-1", dir.path())).await;
}

#[tokio::test]
async fn filesystem_records_survive_a_new_library() {
    let dir = tempfile::tempdir().unwrap();
    let (_, progress) = recorder();
    let record = DocumentLibrary::on_disk("u1", dir.path())
        .upload("nda.md", b"# NDA", &progress)
        .await
        .unwrap();

    let reopened = DocumentLibrary::on_disk("u1", dir.path());
    let listed = reopened.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, record.id);
    assert_eq!(listed[0].content_type, "text/markdown");
    assert!(listed[0].download_url.starts_with("file://"));

    assert!(DocumentLibrary::on_disk("u2", dir.path())
        .list()
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn large_upload_reports_chunked_progress() {
    let (seen, progress) = recorder();
    let bytes = vec![b'a'; 200 * 1024];
    DocumentLibrary::in_memory("u1")
        .upload("big.txt", &bytes, &progress)
        .await
        .unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 4);
    assert!(seen.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(seen.last().copied(), Some(1.0));
}

#[tokio::test]
async fn binary_document_is_not_text() {
    let (_, progress) = recorder();
    let library = DocumentLibrary::in_memory("u1");
    let record = library
        .upload("scan.pdf", &[0x25, 0x50, 0xff, 0xfe], &progress)
        .await
        .unwrap();
    assert_eq!(record.content_type, "application/pdf");
    assert!(matches!(
        library.load_text(&record.id).await,
        Err(StoreError::NotText(_))
    ));
}

#[tokio::test]
async fn unusable_filename_is_rejected() {
    let (_, progress) = recorder();
    let err = DocumentLibrary::in_memory("u1")
        .upload("docs/", b"x", &progress)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidPath(_)));
}

#[tokio::test]
async fn newest_document_is_listed_first() {
    let (_, progress) = recorder();
    let library = DocumentLibrary::in_memory("u1");
    let first = library.upload("a.txt", b"a", &progress).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = library.upload("b.txt", b"b", &progress).await.unwrap();

    let ids: Vec<_> = library.list().await.unwrap().into_iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

async fn same_name_uploads_stay_separate(library: DocumentLibrary) {
    let (_, progress) = recorder();
    let first = library.upload("a.txt", b"first draft", &progress).await.unwrap();
    let second = library.upload("a.txt", b"second draft", &progress).await.unwrap();

    assert_ne!(first.storage_path, second.storage_path);
    assert_eq!(library.load_text(&first.id).await.unwrap(), "first draft");
    assert_eq!(library.load_text(&second.id).await.unwrap(), "second draft");

    library.delete(&first.id).await.unwrap();
    assert_eq!(library.load_text(&second.id).await.unwrap(), "second draft");
}

#[tokio::test]
async fn memory_uploads_with_one_name_do_not_overwrite() {
    same_name_uploads_stay_separate(DocumentLibrary::in_memory("u1")).await;
}

#[tokio::test]
async fn filesystem_uploads_with_one_name_do_not_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    same_name_uploads_stay_separate(DocumentLibrary::on_disk("u1", dir.path())).await;
}

#[tokio::test]
async fn blob_store_refuses_to_overwrite_a_path() {
    let blobs = MemoryBlobStore::new();
    let path = "users/u1/documents/1_a.txt";
    blobs.upload(path, b"kept", &|_: f32| {}).await.unwrap();

    let err = blobs.upload(path, b"lost", &|_: f32| {}).await.unwrap_err();
    assert!(matches!(err, StoreError::AlreadyExists(_)));
    assert_eq!(blobs.read(path).await.unwrap(), b"kept");
}

#[tokio::test]
async fn filesystem_blob_store_refuses_to_overwrite_a_path() {
    let dir = tempfile::tempdir().unwrap();
    let blobs = FsBlobStore::new(dir.path());
    let path = "users/u1/documents/1_a.txt";
    blobs.upload(path, b"kept", &|_: f32| {}).await.unwrap();

    let err = blobs.upload(path, b"lost", &|_: f32| {}).await.unwrap_err();
    assert!(matches!(err, StoreError::AlreadyExists(_)));
    assert_eq!(blobs.read(path).await.unwrap(), b"kept");
}

struct RejectingStore;

#[async_trait]
impl DocumentStore for RejectingStore {
    async fn create(&self, _: NewDocument) -> Result<UploadedDocument, StoreError> {
        Err(StoreError::Init("record store offline".to_string()))
    }

    async fn list(&self, _: &str) -> Result<Vec<UploadedDocument>, StoreError> {
        Ok(Vec::new())
    }

    async fn get(&self, _: &str, id: &str) -> Result<UploadedDocument, StoreError> {
        Err(StoreError::NotFound(id.to_string()))
    }

    async fn delete(&self, _: &str, id: &str) -> Result<(), StoreError> {
        Err(StoreError::NotFound(id.to_string()))
    }
}

#[tokio::test]
async fn failed_record_creation_removes_the_blob() {
    let blobs = Arc::new(MemoryBlobStore::new());
    let library = DocumentLibrary::new("u1", Arc::new(RejectingStore), blobs.clone());

    let (_, progress) = recorder();
    let err = library.upload("a.txt", b"a", &progress).await.unwrap_err();
    assert!(matches!(err, StoreError::Init(_)));
    assert!(blobs.is_empty().await);
}

#[tokio::test]
async fn memory_store_isolates_users() {
    let store = MemoryDocumentStore::new();
    let record = store
        .create(NewDocument {
            user_id: "u1".to_string(),
            filename: "a.txt".to_string(),
            content_type: "text/plain".to_string(),
            file_size: 1,
            storage_path: "users/u1/documents/1_a.txt".to_string(),
            download_url: "memory://users/u1/documents/1_a.txt".to_string(),
        })
        .await
        .unwrap();

    assert!(store.get("u2", &record.id).await.is_err());
    assert!(store.list("u2").await.unwrap().is_empty());
    assert_eq!(store.get("u1", &record.id).await.unwrap(), record);
}

#[tokio::test]
async fn library_reports_its_owner() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(DocumentLibrary::in_memory("advocate-1").user_id(), "advocate-1");
    assert_eq!(DocumentLibrary::on_disk("u2", dir.path()).user_id(), "u2");
}
