use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(FromRow)]
pub struct RoleModel {
    id: Uuid,
    name: String,
}

impl RoleModel {
    pub fn new(id: &Uuid, name: &str) -> Self {
        Self {
            id: *id,
            name: name.to_owned(),
        }
    }

    pub fn id(&self) -> &Uuid {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
