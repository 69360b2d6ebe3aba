use anyhow::Result;
use sqlx::{Executor, Pool, Postgres};
use uuid::Uuid;

use crate::{db::PostgresDb, model::collaborator_assignment::CollaboratorAssignmentModel};

const INSERT: &str = "INSERT INTO \"collaborator_assignments\" (\"id\", \"collaborator_id\", \"role_id\", \"member_id\", \"organization_id\") VALUES ($1, $2, $3, $4, $5)";
const SELECT_MANY_BY_COLLABORATOR_IDS: &str = "SELECT \"id\", \"collaborator_id\", \"role_id\", \"member_id\", \"organization_id\" FROM \"collaborator_assignments\" WHERE \"collaborator_id\" = ANY($1) ORDER BY \"id\"";

pub async fn init(pool: &Pool<Postgres>) -> Result<()> {
    sd_log::info(
        Some("🔧"),
        "[PostgreSQL] Setting up collaborator_assignments table",
    );

    pool.execute("CREATE TABLE IF NOT EXISTS \"collaborator_assignments\" (\"id\" uuid, \"collaborator_id\" uuid NOT NULL REFERENCES \"collaborators\" (\"id\"), \"role_id\" uuid NOT NULL REFERENCES \"roles\" (\"id\"), \"member_id\" uuid REFERENCES \"members\" (\"id\"), \"organization_id\" uuid REFERENCES \"organizations\" (\"id\"), PRIMARY KEY (\"id\"), CHECK (\"member_id\" IS NULL OR \"organization_id\" IS NULL))").await?;

    Ok(())
}

impl PostgresDb {
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
        Ok(self
            .fetch_all(sqlx::query_as(SELECT_MANY_BY_COLLABORATOR_IDS).bind(collaborator_ids))
            .await?)
    }
}
