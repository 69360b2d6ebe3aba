use serde::{Deserialize, Serialize};

/// Grants read access to a single stored object until `exp`.
#[derive(Deserialize, Serialize)]
pub struct Claim {
    bucket: String,
    key: String,
    exp: usize,
}

impl Claim {
    pub fn new(bucket: &str, key: &str, exp: &usize) -> Self {
        Self {
            bucket: bucket.to_owned(),
            key: key.to_owned(),
            exp: *exp,
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn exp(&self) -> &usize {
        &self.exp
    }

    pub fn grants(&self, bucket: &str, key: &str) -> bool {
        self.bucket == bucket && self.key == key
    }
}
