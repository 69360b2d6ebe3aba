use anyhow::Result;
use sqlx::{Executor, Pool, Sqlite};
use uuid::Uuid;

use crate::{db::SqliteDb, model::collaborator::CollaboratorModel};

const INSERT: &str = "INSERT INTO \"collaborators\" (\"id\", \"project_id\", \"assigned_at\", \"deleted_at\") VALUES (?, ?, ?, ?)";
const SELECT_MANY_BY_PROJECT_ID: &str = "SELECT \"id\", \"project_id\", \"assigned_at\", \"deleted_at\" FROM \"collaborators\" WHERE \"project_id\" = ? AND \"deleted_at\" IS NULL ORDER BY \"id\"";

pub async fn init(pool: &Pool<Sqlite>) -> Result<()> {
    sd_log::info(Some("🔧"), "[SQLite] Setting up collaborators table");

    pool.execute("CREATE TABLE IF NOT EXISTS \"collaborators\" (\"id\" blob, \"project_id\" blob NOT NULL REFERENCES \"projects\" (\"id\"), \"assigned_at\" datetime NOT NULL, \"deleted_at\" datetime, PRIMARY KEY (\"id\"))").await?;

    Ok(())
}

impl SqliteDb {
    pub async fn insert_collaborator(&self, value: &CollaboratorModel) -> Result<()> {
        self.execute(
            sqlx::query(INSERT)
                .bind(value.id())
                .bind(value.project_id())
                .bind(value.assigned_at())
                .bind(value.deleted_at()),
        )
        .await?;
        Ok(())
    }

    pub async fn select_many_collaborators_by_project_id(
        &self,
        project_id: &Uuid,
    ) -> Result<Vec<CollaboratorModel>> {
        Ok(self
            .fetch_all(sqlx::query_as(SELECT_MANY_BY_PROJECT_ID).bind(project_id))
            .await?)
    }
}
