use std::sync::Arc;

use ahash::HashSet;
use sd_service::project::ProjectService;
use sd_token_jwt::token::JwtToken;

pub struct ApiRestCtx {
    service: ApiRestServiceCtx,
    token: ApiRestTokenCtx,
    storage: ApiRestStorageCtx,
}

impl ApiRestCtx {
    pub fn new(
        service: ApiRestServiceCtx,
        token: ApiRestTokenCtx,
        storage: ApiRestStorageCtx,
    ) -> Self {
        Self {
            service,
            token,
            storage,
        }
    }

    pub fn service(&self) -> &ApiRestServiceCtx {
        &self.service
    }

    pub fn token(&self) -> &ApiRestTokenCtx {
        &self.token
    }

    pub fn storage(&self) -> &ApiRestStorageCtx {
        &self.storage
    }
}

pub struct ApiRestServiceCtx {
    project: ProjectService,
}

impl ApiRestServiceCtx {
    pub fn new(project: ProjectService) -> Self {
        Self { project }
    }

    pub fn project(&self) -> &ProjectService {
        &self.project
    }
}

pub struct ApiRestTokenCtx {
    jwt: Arc<JwtToken>,
}

impl ApiRestTokenCtx {
    pub fn new(jwt: Arc<JwtToken>) -> Self {
        Self { jwt }
    }

    pub fn jwt(&self) -> &JwtToken {
        &self.jwt
    }
}

/// Where the local object store keeps its blobs and which buckets are
/// readable without a token.
pub struct ApiRestStorageCtx {
    path: String,
    public_buckets: HashSet<String>,
    max_file_size: usize,
}

impl ApiRestStorageCtx {
    pub fn new(path: &str, public_buckets: &[String], max_file_size: &usize) -> Self {
        Self {
            path: path.to_owned(),
            public_buckets: public_buckets.iter().cloned().collect(),
            max_file_size: *max_file_size,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_public(&self, bucket: &str) -> bool {
        self.public_buckets.contains(bucket)
    }

    pub fn max_file_size(&self) -> &usize {
        &self.max_file_size
    }
}
