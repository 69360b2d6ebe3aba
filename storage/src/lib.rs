use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

pub mod local;
pub mod object;

pub use object::{StoredObject, UploadFile};

/// Blob storage addressed by bucket and key, exposing objects through URLs
/// of the form `{public_url}/{bucket}/{key}`.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn upload(&self, file: &UploadFile, bucket: &str) -> Result<StoredObject>;

    /// Fails with "Invalid object URL" when `url` is not under this store's public base.
    async fn delete(&self, url: &str) -> Result<()>;

    async fn signed_url(&self, bucket: &str, key: &str, ttl: &Duration) -> Result<String>;
}
