use anyhow::Result;
use sqlx::{Executor, Pool, Postgres};
use uuid::Uuid;

use crate::{db::PostgresDb, model::collaborator::CollaboratorModel};

const INSERT: &str = "INSERT INTO \"collaborators\" (\"id\", \"project_id\", \"assigned_at\", \"deleted_at\") VALUES ($1, $2, $3, $4)";
const SELECT_MANY_BY_PROJECT_ID: &str = "SELECT \"id\", \"project_id\", \"assigned_at\", \"deleted_at\" FROM \"collaborators\" WHERE \"project_id\" = $1 AND \"deleted_at\" IS NULL ORDER BY \"id\"";

pub async fn init(pool: &Pool<Postgres>) -> Result<()> {
    sd_log::info(Some("🔧"), "[PostgreSQL] Setting up collaborators table");

    pool.execute("CREATE TABLE IF NOT EXISTS \"collaborators\" (\"id\" uuid, \"project_id\" uuid NOT NULL REFERENCES \"projects\" (\"id\"), \"assigned_at\" timestamptz(6) NOT NULL, \"deleted_at\" timestamptz(6), PRIMARY KEY (\"id\"))").await?;

    Ok(())
}

impl PostgresDb {
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
