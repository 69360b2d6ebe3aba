use anyhow::Result;
use sd_db_postgresql::model::collaborator_assignment::CollaboratorAssignmentModel as CollaboratorAssignmentPostgresModel;
use sd_db_sqlite::model::collaborator_assignment::CollaboratorAssignmentModel as CollaboratorAssignmentSqliteModel;
use uuid::Uuid;

use crate::Db;

/// Who holds a role on a collaborator: a person or an organization, never both.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AssignmentHolder {
    Member(Uuid),
    Organization(Uuid),
}

pub struct CollaboratorAssignmentDao {
    id: Uuid,
    collaborator_id: Uuid,
    role_id: Uuid,
    member_id: Option<Uuid>,
    organization_id: Option<Uuid>,
}

impl CollaboratorAssignmentDao {
    pub fn new(collaborator_id: &Uuid, role_id: &Uuid, holder: &AssignmentHolder) -> Self {
        let (member_id, organization_id) = match holder {
            AssignmentHolder::Member(id) => (Some(*id), None),
            AssignmentHolder::Organization(id) => (None, Some(*id)),
        };
        Self {
            id: Uuid::now_v7(),
            collaborator_id: *collaborator_id,
            role_id: *role_id,
            member_id,
            organization_id,
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

    /// `None` for legacy rows that reference neither a member nor an organization.
    pub fn holder(&self) -> Option<AssignmentHolder> {
        match (self.member_id, self.organization_id) {
            (Some(id), _) => Some(AssignmentHolder::Member(id)),
            (None, Some(id)) => Some(AssignmentHolder::Organization(id)),
            (None, None) => None,
        }
    }

    pub async fn db_insert(&self, db: &Db) -> Result<()> {
        match db {
            Db::PostgresqlDb(db) => {
                db.insert_collaborator_assignment(&self.to_postgresdb_model())
                    .await
            }
            Db::SqliteDb(db) => {
                db.insert_collaborator_assignment(&self.to_sqlitedb_model())
                    .await
            }
        }
    }

    /// One batched lookup, ordered by insertion.
    pub async fn db_select_many_by_collaborator_ids(
        db: &Db,
        collaborator_ids: &[Uuid],
    ) -> Result<Vec<Self>> {
        match db {
            Db::PostgresqlDb(db) => Ok(db
                .select_many_collaborator_assignments_by_collaborator_ids(collaborator_ids)
                .await?
                .iter()
                .map(Self::from_postgresdb_model)
                .collect()),
            Db::SqliteDb(db) => Ok(db
                .select_many_collaborator_assignments_by_collaborator_ids(collaborator_ids)
                .await?
                .iter()
                .map(Self::from_sqlitedb_model)
                .collect()),
        }
    }

    fn from_postgresdb_model(model: &CollaboratorAssignmentPostgresModel) -> Self {
        Self {
            id: *model.id(),
            collaborator_id: *model.collaborator_id(),
            role_id: *model.role_id(),
            member_id: *model.member_id(),
            organization_id: *model.organization_id(),
        }
    }

    fn to_postgresdb_model(&self) -> CollaboratorAssignmentPostgresModel {
        CollaboratorAssignmentPostgresModel::new(
            &self.id,
            &self.collaborator_id,
            &self.role_id,
            &self.member_id,
            &self.organization_id,
        )
    }

    fn from_sqlitedb_model(model: &CollaboratorAssignmentSqliteModel) -> Self {
        Self {
            id: *model.id(),
            collaborator_id: *model.collaborator_id(),
            role_id: *model.role_id(),
            member_id: *model.member_id(),
            organization_id: *model.organization_id(),
        }
    }

    fn to_sqlitedb_model(&self) -> CollaboratorAssignmentSqliteModel {
        CollaboratorAssignmentSqliteModel::new(
            &self.id,
            &self.collaborator_id,
            &self.role_id,
            &self.member_id,
            &self.organization_id,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holder_sets_exactly_one_reference() {
        let member_id = Uuid::now_v7();
        let assignment = CollaboratorAssignmentDao::new(
            &Uuid::now_v7(),
            &Uuid::now_v7(),
            &AssignmentHolder::Member(member_id),
        );

        assert_eq!(assignment.member_id(), &Some(member_id));
        assert_eq!(assignment.organization_id(), &None);
        assert_eq!(assignment.holder(), Some(AssignmentHolder::Member(member_id)));
    }
}
