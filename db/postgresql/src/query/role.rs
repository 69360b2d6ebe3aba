use anyhow::Result;
use sqlx::{Executor, Pool, Postgres};
use uuid::Uuid;

use crate::{db::PostgresDb, model::role::RoleModel};

const INSERT: &str = "INSERT INTO \"roles\" (\"id\", \"name\") VALUES ($1, $2)";
const SELECT_BY_NAME: &str = "SELECT \"id\", \"name\" FROM \"roles\" WHERE \"name\" = $1";
const SELECT_MANY_BY_IDS: &str = "SELECT \"id\", \"name\" FROM \"roles\" WHERE \"id\" = ANY($1)";

pub async fn init(pool: &Pool<Postgres>) -> Result<()> {
    sd_log::info(Some("🔧"), "[PostgreSQL] Setting up roles table");

    pool.execute("CREATE TABLE IF NOT EXISTS \"roles\" (\"id\" uuid, \"name\" varchar(255) NOT NULL UNIQUE, PRIMARY KEY (\"id\"))").await?;

    Ok(())
}

impl PostgresDb {
    pub async fn insert_role(&self, value: &RoleModel) -> Result<()> {
        self.execute(sqlx::query(INSERT).bind(value.id()).bind(value.name()))
            .await?;
        Ok(())
    }

    pub async fn select_role_by_name(&self, name: &str) -> Result<Option<RoleModel>> {
        Ok(self
            .fetch_optional(sqlx::query_as(SELECT_BY_NAME).bind(name))
            .await?)
    }

    pub async fn select_many_roles_by_ids(&self, ids: &[Uuid]) -> Result<Vec<RoleModel>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .fetch_all(sqlx::query_as(SELECT_MANY_BY_IDS).bind(ids))
            .await?)
    }
}
