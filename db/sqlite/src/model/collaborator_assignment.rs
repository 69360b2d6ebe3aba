use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(FromRow)]
pub struct CollaboratorAssignmentModel {
    id: Uuid,
    collaborator_id: Uuid,
    role_id: Uuid,
    member_id: Option<Uuid>,
    organization_id: Option<Uuid>,
}

impl CollaboratorAssignmentModel {
    pub fn new(
        id: &Uuid,
        collaborator_id: &Uuid,
        role_id: &Uuid,
        member_id: &Option<Uuid>,
        organization_id: &Option<Uuid>,
    ) -> Self {
        Self {
            id: *id,
            collaborator_id: *collaborator_id,
            role_id: *role_id,
            member_id: *member_id,
            organization_id: *organization_id,
        }
    }

    pub fn id(&self) -> &Uuid {
        &self.id
    }

    pub fn collaborator_id(&self) -> &Uuid {
        &self.collaborator_id
    }

    pub fn role_id(&self) -> &Uuid {
        &self.role_id
    }

    pub fn member_id(&self) -> &Option<Uuid> {
        &self.member_id
    }

    pub fn organization_id(&self) -> &Option<Uuid> {
        &self.organization_id
    }
}
