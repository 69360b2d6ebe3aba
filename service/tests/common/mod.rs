#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
    time::Duration,
};

use anyhow::{Error, Result};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use sd_dao::{
    project::{ProjectDao, ProjectKind, ProjectStatus},
    Db,
};
use sd_db_sqlite::db::SqliteDb;
use sd_service::{project::ProjectService, retry::RetryPolicy};
use sd_storage::{ObjectStore, StoredObject, UploadFile};

pub const BASE_URL: &str = "https://store.test";
pub const BUCKET: &str = "project-images";

/// In-memory store whose failures are scripted per file name or URL.
#[derive(Default)]
pub struct ScriptedStore {
    failing_uploads: HashSet<String>,
    failing_deletes: HashSet<String>,
    upload_delay: Duration,
    objects: Mutex<Vec<String>>,
    upload_attempts: Mutex<HashMap<String, u32>>,
    delete_attempts: Mutex<HashMap<String, u32>>,
}

impl ScriptedStore {
    pub fn new(failing_uploads: &[&str], failing_deletes: &[&str]) -> Self {
        Self {
            failing_uploads: failing_uploads.iter().map(|s| s.to_string()).collect(),
            failing_deletes: failing_deletes.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn with_objects(self, urls: &[String]) -> Self {
        self.objects.lock().unwrap().extend(urls.iter().cloned());
        self
    }

    pub fn with_upload_delay(mut self, delay: Duration) -> Self {
        self.upload_delay = delay;
        self
    }

    pub fn objects(&self) -> Vec<String> {
        self.objects.lock().unwrap().clone()
    }

    pub fn upload_attempts(&self, file_name: &str) -> u32 {
        *self.upload_attempts.lock().unwrap().get(file_name).unwrap_or(&0)
    }

    pub fn delete_attempts(&self, url: &str) -> u32 {
        *self.delete_attempts.lock().unwrap().get(url).unwrap_or(&0)
    }
}

#[async_trait]
impl ObjectStore for ScriptedStore {
    async fn upload(&self, file: &UploadFile, bucket: &str) -> Result<StoredObject> {
        *self
            .upload_attempts
            .lock()
            .unwrap()
            .entry(file.name().to_owned())
            .or_default() += 1;
        if !self.upload_delay.is_zero() {
            tokio::time::sleep(self.upload_delay).await;
        }
        if self.failing_uploads.contains(file.name()) {
            return Err(Error::msg("store unavailable"));
        }
        let key = format!("u-{}", file.name());
        let url = format!("{BASE_URL}/{bucket}/{key}");
        self.objects.lock().unwrap().push(url.clone());
        Ok(StoredObject::new(&key, &url))
    }

    async fn delete(&self, url: &str) -> Result<()> {
        *self
            .delete_attempts
            .lock()
            .unwrap()
            .entry(url.to_owned())
            .or_default() += 1;
        if self.failing_deletes.contains(url) {
            return Err(Error::msg("store unavailable"));
        }
        self.objects.lock().unwrap().retain(|object| object != url);
        Ok(())
    }

    async fn signed_url(&self, bucket: &str, key: &str, _ttl: &Duration) -> Result<String> {
        Ok(format!("{BASE_URL}/{bucket}/{key}?token=test"))
    }
}

pub fn url(name: &str) -> String {
    format!("{BASE_URL}/{BUCKET}/{name}")
}

pub fn file(name: &str) -> UploadFile {
    UploadFile::new(name, &Some("image/png".to_owned()), name.as_bytes().to_vec())
}

pub async fn memory_db() -> Arc<Db> {
    Arc::new(Db::SqliteDb(SqliteDb::new(":memory:", &1).await.unwrap()))
}

pub fn service(db: &Arc<Db>, store: &Arc<ScriptedStore>) -> ProjectService {
    let store: Arc<dyn ObjectStore> = store.clone();
    ProjectService::new(
        db.clone(),
        store,
        BUCKET,
        &RetryPolicy::new(&3, &Duration::from_millis(1)),
    )
}

pub async fn seed_project(db: &Db, title: &str, images: &[String]) -> ProjectDao {
    let project = ProjectDao::new(
        title,
        "Brief",
        "Full",
        &Utc.with_ymd_and_hms(2023, 5, 1, 0, 0, 0).unwrap(),
        &[],
        images,
        &ProjectStatus::Active,
        &ProjectKind::Internal,
        &false,
    );
    let mut tx = db.begin().await.unwrap();
    project.db_insert_tx(&mut tx).await.unwrap();
    tx.commit().await.unwrap();
    project
}
