use serde::Deserialize;

use self::{postgres::DbPostgresConfig, sqlite::DbSqliteConfig};

pub mod postgres;
pub mod sqlite;

/// Exactly one backend is expected; postgres wins when both are present.
#[derive(Deserialize)]
pub struct DbConfig {
    postgres: Option<DbPostgresConfig>,
    sqlite: Option<DbSqliteConfig>,
}

impl DbConfig {
    pub fn postgres(&self) -> &Option<DbPostgresConfig> {
        &self.postgres
    }

    pub fn sqlite(&self) -> &Option<DbSqliteConfig> {
        &self.sqlite
    }
}
