use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(FromRow)]
pub struct OrganizationModel {
    id: Uuid,
    name: String,
    description: String,
    logo: Option<String>,
}

impl OrganizationModel {
    pub fn new(id: &Uuid, name: &str, description: &str, logo: &Option<String>) -> Self {
        Self {
            id: *id,
            name: name.to_owned(),
            description: description.to_owned(),
            logo: logo.clone(),
        }
    }

    pub fn id(&self) -> &Uuid {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn logo(&self) -> &Option<String> {
        &self.logo
    }
}
