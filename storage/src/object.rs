use anyhow::{Error, Result};
use uuid::Uuid;

/// A file received from a client, held in memory so that it can be re-sent on retry.
#[derive(Clone, Debug)]
pub struct UploadFile {
    name: String,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: &str, content_type: &Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.to_owned(),
            content_type: content_type.clone(),
            bytes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content_type(&self) -> &Option<String> {
        &self.content_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct StoredObject {
    key: String,
    url: String,
}

impl StoredObject {
    pub fn new(key: &str, url: &str) -> Self {
        Self {
            key: key.to_owned(),
            url: url.to_owned(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Builds a fresh, collision-free key for `file_name`.
pub fn generate_key(file_name: &str) -> String {
    format!("{}-{}", Uuid::now_v7(), sanitize_file_name(file_name))
}

pub fn sanitize_file_name(file_name: &str) -> String {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    let sanitized: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let sanitized = sanitized.trim_start_matches('.');
    if sanitized.is_empty() {
        "file".to_owned()
    } else {
        sanitized.to_owned()
    }
}

/// Rejects path segments that could escape their bucket directory.
pub fn check_segment(segment: &str) -> Result<()> {
    if segment.is_empty()
        || segment.starts_with('.')
        || segment.contains(['/', '\\'])
        || segment.contains("..")
    {
        return Err(Error::msg(format!("Invalid object path segment '{segment}'")));
    }
    Ok(())
}

/// Splits an object URL into `(bucket, key)` relative to `public_url`.
pub fn parse_object_url<'a>(public_url: &str, url: &'a str) -> Result<(&'a str, &'a str)> {
    let path = url
        .strip_prefix(public_url)
        .and_then(|rest| rest.strip_prefix('/'))
        .ok_or_else(|| Error::msg("Invalid object URL"))?;
    let path = path.split(['?', '#']).next().unwrap_or(path);
    let (bucket, key) = path
        .split_once('/')
        .ok_or_else(|| Error::msg("Invalid object URL"))?;
    check_segment(bucket)?;
    check_segment(key)?;
    Ok((bucket, key))
}
