use anyhow::Result;
use sqlx::{Executor, Pool, Sqlite};
use uuid::Uuid;

use crate::{
    db::{placeholders, SqliteDb},
    model::collaborator_assignment::CollaboratorAssignmentModel,
};

const INSERT: &str = "INSERT INTO \"collaborator_assignments\" (\"id\", \"collaborator_id\", \"role_id\", \"member_id\", \"organization_id\") VALUES (?, ?, ?, ?, ?)";
const SELECT_MANY: &str = "SELECT \"id\", \"collaborator_id\", \"role_id\", \"member_id\", \"organization_id\" FROM \"collaborator_assignments\"";

pub async fn init(pool: &Pool<Sqlite>) -> Result<()> {
    sd_log::info(
        Some("🔧"),
        "[SQLite] Setting up collaborator_assignments table",
    );

    pool.execute("CREATE TABLE IF NOT EXISTS \"collaborator_assignments\" (\"id\" blob, \"collaborator_id\" blob NOT NULL REFERENCES \"collaborators\" (\"id\"), \"role_id\" blob NOT NULL REFERENCES \"roles\" (\"id\"), \"member_id\" blob REFERENCES \"members\" (\"id\"), \"organization_id\" blob REFERENCES \"organizations\" (\"id\"), PRIMARY KEY (\"id\"), CHECK (\"member_id\" IS NULL OR \"organization_id\" IS NULL))").await?;

    Ok(())
}

impl SqliteDb {
    pub async fn insert_collaborator_assignment(
        &self,
        value: &CollaboratorAssignmentModel,
    ) -> Result<()> {
        self.execute(
            sqlx::query(INSERT)
                .bind(value.id())
                .bind(value.collaborator_id())
                .bind(value.role_id())
                .bind(value.member_id())
                .bind(value.organization_id()),
        )
        .await?;
        Ok(())
    }

    pub async fn select_many_collaborator_assignments_by_collaborator_ids(
        &self,
        collaborator_ids: &[Uuid],
    ) -> Result<Vec<CollaboratorAssignmentModel>> {
        if collaborator_ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "{SELECT_MANY} WHERE \"collaborator_id\" IN ({}) ORDER BY \"id\"",
            placeholders(collaborator_ids.len())
        );
        let mut query = sqlx::query_as(&sql);
        for collaborator_id in collaborator_ids {
            query = query.bind(collaborator_id);
        }

        Ok(self.fetch_all(query).await?)
    }
}
