use anyhow::Result;
use sqlx::{Executor, Pool, Postgres};
use uuid::Uuid;

use crate::{db::PostgresDb, model::organization::OrganizationModel};

const INSERT: &str = "INSERT INTO \"organizations\" (\"id\", \"name\", \"description\", \"logo\") VALUES ($1, $2, $3, $4)";
const SELECT_MANY_BY_IDS: &str = "SELECT \"id\", \"name\", \"description\", \"logo\" FROM \"organizations\" WHERE \"id\" = ANY($1)";

pub async fn init(pool: &Pool<Postgres>) -> Result<()> {
    sd_log::info(Some("🔧"), "[PostgreSQL] Setting up organizations table");

    pool.execute("CREATE TABLE IF NOT EXISTS \"organizations\" (\"id\" uuid, \"name\" varchar(255) NOT NULL, \"description\" text NOT NULL, \"logo\" varchar(2048), PRIMARY KEY (\"id\"))").await?;

    Ok(())
}

impl PostgresDb {
    pub async fn insert_organization(&self, value: &OrganizationModel) -> Result<()> {
        self.execute(
            sqlx::query(INSERT)
                .bind(value.id())
                .bind(value.name())
                .bind(value.description())
                .bind(value.logo()),
        )
        .await?;
        Ok(())
    }

    pub async fn select_many_organizations_by_ids(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<OrganizationModel>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .fetch_all(sqlx::query_as(SELECT_MANY_BY_IDS).bind(ids))
            .await?)
    }
}
