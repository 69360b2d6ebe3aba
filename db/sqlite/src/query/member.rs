use anyhow::Result;
use sqlx::{Executor, Pool, Sqlite};
use uuid::Uuid;

use crate::{
    db::{placeholders, SqliteDb},
    model::member::MemberModel,
};

const INSERT: &str = "INSERT INTO \"members\" (\"id\", \"name\", \"email\", \"photo\", \"is_visible\") VALUES (?, ?, ?, ?, ?)";
const SELECT_MANY: &str =
    "SELECT \"id\", \"name\", \"email\", \"photo\", \"is_visible\" FROM \"members\"";

pub async fn init(pool: &Pool<Sqlite>) -> Result<()> {
    sd_log::info(Some("🔧"), "[SQLite] Setting up members table");

    pool.execute("CREATE TABLE IF NOT EXISTS \"members\" (\"id\" blob, \"name\" text NOT NULL, \"email\" text NOT NULL, \"photo\" text NOT NULL, \"is_visible\" boolean NOT NULL DEFAULT false, PRIMARY KEY (\"id\"))").await?;

    Ok(())
}

impl SqliteDb {
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

        let sql = format!("{SELECT_MANY} WHERE \"id\" IN ({})", placeholders(ids.len()));
        let mut query = sqlx::query_as(&sql);
        for id in ids {
            query = query.bind(id);
        }

        Ok(self.fetch_all(query).await?)
    }
}
