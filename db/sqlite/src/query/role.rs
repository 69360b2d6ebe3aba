use anyhow::Result;
use sqlx::{Executor, Pool, Sqlite};
use uuid::Uuid;

use crate::{
    db::{placeholders, SqliteDb},
    model::role::RoleModel,
};

const INSERT: &str = "INSERT INTO \"roles\" (\"id\", \"name\") VALUES (?, ?)";
const SELECT_BY_NAME: &str = "SELECT \"id\", \"name\" FROM \"roles\" WHERE \"name\" = ?";
const SELECT_MANY: &str = "SELECT \"id\", \"name\" FROM \"roles\"";

pub async fn init(pool: &Pool<Sqlite>) -> Result<()> {
    sd_log::info(Some("🔧"), "[SQLite] Setting up roles table");

    pool.execute("CREATE TABLE IF NOT EXISTS \"roles\" (\"id\" blob, \"name\" text NOT NULL UNIQUE, PRIMARY KEY (\"id\"))").await?;

    Ok(())
}

impl SqliteDb {
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

        let sql = format!("{SELECT_MANY} WHERE \"id\" IN ({})", placeholders(ids.len()));
        let mut query = sqlx::query_as(&sql);
        for id in ids {
            query = query.bind(id);
        }

        Ok(self.fetch_all(query).await?)
    }
}
