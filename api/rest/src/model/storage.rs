use serde::Deserialize;

#[derive(Deserialize)]
pub struct FindOneObjectReqPath {
    bucket: String,
    key: String,
}

impl FindOneObjectReqPath {
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

#[derive(Deserialize)]
pub struct FindOneObjectReqQuery {
    token: Option<String>,
}

impl FindOneObjectReqQuery {
    pub fn token(&self) -> &Option<String> {
        &self.token
    }
}
