use anyhow::Result;
use sqlx::{Executor, Pool, Sqlite};
use uuid::Uuid;

use crate::{
    db::{placeholders, SqliteDb},
    model::organization::OrganizationModel,
};

const INSERT: &str = "INSERT INTO \"organizations\" (\"id\", \"name\", \"description\", \"logo\") VALUES (?, ?, ?, ?)";
const SELECT_MANY: &str =
    "SELECT \"id\", \"name\", \"description\", \"logo\" FROM \"organizations\"";

pub async fn init(pool: &Pool<Sqlite>) -> Result<()> {
    sd_log::info(Some("🔧"), "[SQLite] Setting up organizations table");

    pool.execute("CREATE TABLE IF NOT EXISTS \"organizations\" (\"id\" blob, \"name\" text NOT NULL, \"description\" text NOT NULL, \"logo\" text, PRIMARY KEY (\"id\"))").await?;

    Ok(())
}

impl SqliteDb {
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

        let sql = format!("{SELECT_MANY} WHERE \"id\" IN ({})", placeholders(ids.len()));
        let mut query = sqlx::query_as(&sql);
        for id in ids {
            query = query.bind(id);
        }

        Ok(self.fetch_all(query).await?)
    }
}
