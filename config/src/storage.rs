use std::time::Duration;

use serde::Deserialize;

#[derive(Deserialize)]
pub struct StorageConfig {
    path: String,
    public_url: String,
    image_bucket: String,
    #[serde(default)]
    public_buckets: Vec<String>,
    max_file_size: usize,
    #[serde(default)]
    retry: StorageRetryConfig,
}

impl StorageConfig {
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Base of every object URL, without a trailing slash.
    pub fn public_url(&self) -> &str {
        self.public_url.trim_end_matches('/')
    }

    pub fn image_bucket(&self) -> &str {
        &self.image_bucket
    }

    pub fn public_buckets(&self) -> &Vec<String> {
        &self.public_buckets
    }

    pub fn max_file_size(&self) -> &usize {
        &self.max_file_size
    }

    pub fn retry(&self) -> &StorageRetryConfig {
        &self.retry
    }
}

#[derive(Deserialize)]
#[serde(default)]
pub struct StorageRetryConfig {
    retries: u32,
    #[serde(deserialize_with = "duration_str::deserialize_duration")]
    delay: Duration,
}

impl Default for StorageRetryConfig {
    fn default() -> Self {
        Self {
            retries: 3,
            delay: Duration::from_millis(500),
        }
    }
}

impl StorageRetryConfig {
    pub fn retries(&self) -> &u32 {
        &self.retries
    }

    pub fn delay(&self) -> &Duration {
        &self.delay
    }
}
