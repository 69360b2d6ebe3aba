use serde::Deserialize;

#[derive(Deserialize)]
pub struct TokenConfig {
    jwt: JwtTokenConfig,
}

impl TokenConfig {
    pub fn jwt(&self) -> &JwtTokenConfig {
        &self.jwt
    }
}

#[derive(Deserialize)]
pub struct JwtTokenConfig {
    secret: String,
}

impl JwtTokenConfig {
    pub fn secret(&self) -> &str {
        &self.secret
    }
}
