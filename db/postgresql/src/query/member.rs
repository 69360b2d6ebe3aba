use anyhow::Result;
use sqlx::{Executor, Pool, Postgres};
use uuid::Uuid;

use crate::{db::PostgresDb, model::member::MemberModel};

const INSERT: &str = "INSERT INTO \"members\" (\"id\", \"name\", \"email\", \"photo\", \"is_visible\") VALUES ($1, $2, $3, $4, $5)";
const SELECT_MANY_BY_IDS: &str = "SELECT \"id\", \"name\", \"email\", \"photo\", \"is_visible\" FROM \"members\" WHERE \"id\" = ANY($1)";

pub async fn init(pool: &Pool<Postgres>) -> Result<()> {
    sd_log::info(Some("🔧"), "[PostgreSQL] Setting up members table");

    pool.execute("CREATE TABLE IF NOT EXISTS \"members\" (\"id\" uuid, \"name\" varchar(255) NOT NULL, \"email\" varchar(255) NOT NULL, \"photo\" varchar(2048) NOT NULL, \"is_visible\" boolean NOT NULL DEFAULT false, PRIMARY KEY (\"id\"))").await?;

    Ok(())
}

impl PostgresDb {
    pub async fn insert_member(&self, value: &MemberModel) -> Result<()> {
        self.execute(
            sqlx::query(INSERT)
                .bind(value.id())
                .bind(value.name())
                .bind(value.email())
                .bind(value.photo())
                .bind(value.is_visible()),
        )
        .await?;
        Ok(())
    }

    pub async fn select_many_members_by_ids(&self, ids: &[Uuid]) -> Result<Vec<MemberModel>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .fetch_all(sqlx::query_as(SELECT_MANY_BY_IDS).bind(ids))
            .await?)
    }
}
