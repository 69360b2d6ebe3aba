use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use anyhow::Result;
use async_trait::async_trait;
use sd_token_jwt::token::JwtToken;
use tokio::fs;

use crate::{
    object::{check_segment, generate_key, parse_object_url, StoredObject, UploadFile},
    ObjectStore,
};

/// Object store backed by a directory tree: `{root}/{bucket}/{key}`.
pub struct LocalObjectStore {
    root: PathBuf,
    public_url: String,
    jwt: Arc<JwtToken>,
}

impl LocalObjectStore {
    pub fn new(root: &str, public_url: &str, jwt: Arc<JwtToken>) -> Self {
        sd_log::info(Some("⚡"), "[LocalObjectStore] Initializing component");

        Self {
            root: PathBuf::from(root),
            public_url: public_url.trim_end_matches('/').to_owned(),
            jwt,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn public_url(&self) -> &str {
        &self.public_url
    }

    pub fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf> {
        check_segment(bucket)?;
        check_segment(key)?;
        Ok(self.root.join(bucket).join(key))
    }

    fn object_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/{}/{}", self.public_url, bucket, key)
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn upload(&self, file: &UploadFile, bucket: &str) -> Result<StoredObject> {
        let key = generate_key(file.name());
        let path = self.object_path(bucket, &key)?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).await?;
        }
        fs::write(&path, file.bytes()).await?;

        sd_log::debug(
            None,
            &format!("[LocalObjectStore] Stored {} bytes at {bucket}/{key}", file.bytes().len()),
        );

        Ok(StoredObject::new(&key, &self.object_url(bucket, &key)))
    }

    async fn delete(&self, url: &str) -> Result<()> {
        let (bucket, key) = parse_object_url(&self.public_url, url)?;
        match fs::remove_file(self.object_path(bucket, key)?).await {
            Ok(_) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    async fn signed_url(&self, bucket: &str, key: &str, ttl: &Duration) -> Result<String> {
        check_segment(bucket)?;
        check_segment(key)?;
        let token = self.jwt.encode(bucket, key, ttl)?;
        Ok(format!("{}?token={token}", self.object_url(bucket, key)))
    }
}
