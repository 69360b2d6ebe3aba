use anyhow::Result;
use chrono::{DateTime, Utc};
use sd_db_postgresql::model::collaborator::CollaboratorModel as CollaboratorPostgresModel;
use sd_db_sqlite::model::collaborator::CollaboratorModel as CollaboratorSqliteModel;
use uuid::Uuid;

use crate::Db;

pub struct CollaboratorDao {
    id: Uuid,
    project_id: Uuid,
    assigned_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl CollaboratorDao {
    pub fn new(project_id: &Uuid) -> Self {
        Self {
            id: Uuid::now_v7(),
            project_id: *project_id,
            assigned_at: Utc::now(),
            deleted_at: None,
        }
    }

    pub fn id(&self) -> &Uuid {
        &self.id
    }

    pub fn project_id(&self) -> &Uuid {
        &self.project_id
    }

    pub fn assigned_at(&self) -> &DateTime<Utc> {
        &self.assigned_at
    }

    pub fn deleted_at(&self) -> &Option<DateTime<Utc>> {
        &self.deleted_at
    }

    pub async fn db_insert(&self, db: &Db) -> Result<()> {
        match db {
            Db::PostgresqlDb(db) => db.insert_collaborator(&self.to_postgresdb_model()).await,
            Db::SqliteDb(db) => db.insert_collaborator(&self.to_sqlitedb_model()).await,
        }
    }

    /// Live collaborators only.
    pub async fn db_select_many_by_project_id(db: &Db, project_id: &Uuid) -> Result<Vec<Self>> {
        match db {
            Db::PostgresqlDb(db) => Ok(db
                .select_many_collaborators_by_project_id(project_id)
                .await?
                .iter()
                .map(Self::from_postgresdb_model)
                .collect()),
            Db::SqliteDb(db) => Ok(db
                .select_many_collaborators_by_project_id(project_id)
                .await?
                .iter()
                .map(Self::from_sqlitedb_model)
                .collect()),
        }
    }

    fn from_postgresdb_model(model: &CollaboratorPostgresModel) -> Self {
        Self {
            id: *model.id(),
            project_id: *model.project_id(),
            assigned_at: *model.assigned_at(),
            deleted_at: *model.deleted_at(),
        }
    }

    fn to_postgresdb_model(&self) -> CollaboratorPostgresModel {
        CollaboratorPostgresModel::new(
            &self.id,
            &self.project_id,
            &self.assigned_at,
            &self.deleted_at,
        )
    }

    fn from_sqlitedb_model(model: &CollaboratorSqliteModel) -> Self {
        Self {
            id: *model.id(),
            project_id: *model.project_id(),
            assigned_at: *model.assigned_at(),
            deleted_at: *model.deleted_at(),
        }
    }

    fn to_sqlitedb_model(&self) -> CollaboratorSqliteModel {
        CollaboratorSqliteModel::new(
            &self.id,
            &self.project_id,
            &self.assigned_at,
            &self.deleted_at,
        )
    }
}
