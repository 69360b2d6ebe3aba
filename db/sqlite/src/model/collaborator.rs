use sqlx::{
    prelude::FromRow,
    types::chrono::{DateTime, Utc},
};
use uuid::Uuid;

#[derive(FromRow)]
pub struct CollaboratorModel {
    id: Uuid,
    project_id: Uuid,
    assigned_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl CollaboratorModel {
    pub fn new(
        id: &Uuid,
        project_id: &Uuid,
        assigned_at: &DateTime<Utc>,
        deleted_at: &Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: *id,
            project_id: *project_id,
            assigned_at: *assigned_at,
            deleted_at: *deleted_at,
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
}
