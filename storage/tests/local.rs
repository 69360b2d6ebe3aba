use std::{sync::Arc, time::Duration};

use sd_storage::{local::LocalObjectStore, ObjectStore, UploadFile};
use sd_token_jwt::token::JwtToken;

const PUBLIC_URL: &str = "http://localhost:8080/storage";

fn store(dir: &tempfile::TempDir, jwt: Arc<JwtToken>) -> LocalObjectStore {
    LocalObjectStore::new(&dir.path().to_string_lossy(), PUBLIC_URL, jwt)
}

#[tokio::test]
async fn upload_then_delete_removes_the_blob() {
    let dir = tempfile::tempdir().unwrap();
    let store = store(&dir, Arc::new(JwtToken::new("secret")));

    let file = UploadFile::new("d.png", &Some("image/png".to_owned()), b"png".to_vec());
    let stored = store.upload(&file, "project-images").await.unwrap();

    assert_eq!(
        stored.url(),
        format!("{PUBLIC_URL}/project-images/{}", stored.key())
    );
    let path = dir.path().join("project-images").join(stored.key());
    assert_eq!(tokio::fs::read(&path).await.unwrap(), b"png");

    store.delete(stored.url()).await.unwrap();
    assert!(!path.exists());

    // Already gone is not an error.
    store.delete(stored.url()).await.unwrap();
}

#[tokio::test]
async fn delete_rejects_foreign_urls() {
    let dir = tempfile::tempdir().unwrap();
    let store = store(&dir, Arc::new(JwtToken::new("secret")));

    let err = store
        .delete("https://cdn.example.com/project-images/a.png")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid object URL");
}

#[tokio::test]
async fn signed_url_carries_a_token_for_the_object() {
    let dir = tempfile::tempdir().unwrap();
    let jwt = Arc::new(JwtToken::new("secret"));
    let store = store(&dir, jwt.clone());

    let url = store
        .signed_url("private", "a.png", &Duration::from_secs(60))
        .await
        .unwrap();
    let (base, token) = url.split_once("?token=").unwrap();

    assert_eq!(base, format!("{PUBLIC_URL}/private/a.png"));
    assert!(jwt.decode(token).unwrap().grants("private", "a.png"));
}
