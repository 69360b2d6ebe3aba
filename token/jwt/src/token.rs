use std::time::{self, Duration};

use anyhow::Result;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::claim::Claim;

pub struct JwtToken {
    header: Header,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtToken {
    pub fn new(secret: &str) -> Self {
        sd_log::info(Some("⚡"), "[JwtToken] Initializing component");

        let secret = secret.as_bytes();
        Self {
            header: Header::default(),
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    pub fn encode(&self, bucket: &str, key: &str, ttl: &Duration) -> Result<String> {
        let expiration_time = usize::try_from(
            time::SystemTime::now()
                .duration_since(time::UNIX_EPOCH)?
                .as_secs()
                + ttl.as_secs(),
        )?;

        Ok(encode(
            &self.header,
            &Claim::new(bucket, key, &expiration_time),
            &self.encoding_key,
        )?)
    }

    /// Fails on a bad signature or an expired token.
    pub fn decode(&self, token: &str) -> Result<Claim> {
        Ok(decode::<Claim>(token, &self.decoding_key, &Validation::default())?.claims)
    }
}
