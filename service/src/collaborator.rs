use ahash::HashMap;
use anyhow::Result;
use itertools::Itertools;
use sd_dao::{
    collaborator::CollaboratorDao,
    collaborator_assignment::{AssignmentHolder, CollaboratorAssignmentDao},
    member::MemberDao,
    organization::OrganizationDao,
    role::RoleDao,
    Db,
};
use uuid::Uuid;

pub const UNKNOWN_ROLE: &str = "Unknown";

#[derive(Default, Clone, Debug)]
pub struct RoleCollaborators {
    members: Vec<MemberDao>,
    organizations: Vec<OrganizationDao>,
}

impl RoleCollaborators {
    pub fn members(&self) -> &Vec<MemberDao> {
        &self.members
    }

    pub fn organizations(&self) -> &Vec<OrganizationDao> {
        &self.organizations
    }
}

pub type CollaboratorsByRole = HashMap<String, RoleCollaborators>;

/// Collaborators of a live project keyed by role name.
///
/// Runs a fixed number of queries no matter how many collaborators exist.
pub async fn collaborators_by_role(db: &Db, project_id: &Uuid) -> Result<CollaboratorsByRole> {
    let collaborators = CollaboratorDao::db_select_many_by_project_id(db, project_id).await?;
    if collaborators.is_empty() {
        return Ok(CollaboratorsByRole::default());
    }

    let collaborator_ids: Vec<Uuid> = collaborators.iter().map(|c| *c.id()).collect();
    let assignments =
        CollaboratorAssignmentDao::db_select_many_by_collaborator_ids(db, &collaborator_ids)
            .await?;
    if assignments.is_empty() {
        return Ok(CollaboratorsByRole::default());
    }

    let role_ids: Vec<Uuid> = assignments.iter().map(|a| *a.role_id()).unique().collect();
    let member_ids: Vec<Uuid> = assignments
        .iter()
        .filter_map(|a| *a.member_id())
        .unique()
        .collect();
    let organization_ids: Vec<Uuid> = assignments
        .iter()
        .filter_map(|a| *a.organization_id())
        .unique()
        .collect();

    let (roles, members, organizations) = tokio::try_join!(
        RoleDao::db_select_many_by_ids(db, &role_ids),
        MemberDao::db_select_many_by_ids(db, &member_ids),
        OrganizationDao::db_select_many_by_ids(db, &organization_ids),
    )?;

    Ok(group_by_role(&assignments, &roles, &members, &organizations))
}

/// Buckets follow the order of `assignments`. Holders that failed to
/// resolve are skipped, but their role key is still created.
pub fn group_by_role(
    assignments: &[CollaboratorAssignmentDao],
    roles: &[RoleDao],
    members: &[MemberDao],
    organizations: &[OrganizationDao],
) -> CollaboratorsByRole {
    let role_names: HashMap<&Uuid, &str> = roles.iter().map(|r| (r.id(), r.name())).collect();
    let members: HashMap<&Uuid, &MemberDao> = members.iter().map(|m| (m.id(), m)).collect();
    let organizations: HashMap<&Uuid, &OrganizationDao> =
        organizations.iter().map(|o| (o.id(), o)).collect();

    let mut grouped = CollaboratorsByRole::default();
    for assignment in assignments {
        let role_name = role_names
            .get(assignment.role_id())
            .copied()
            .unwrap_or(UNKNOWN_ROLE);
        let bucket = grouped.entry(role_name.to_owned()).or_default();

        match assignment.holder() {
            Some(AssignmentHolder::Member(id)) => {
                if let Some(member) = members.get(&id) {
                    bucket.members.push((*member).clone());
                }
            }
            Some(AssignmentHolder::Organization(id)) => {
                if let Some(organization) = organizations.get(&id) {
                    bucket.organizations.push((*organization).clone());
                }
            }
            None => {}
        }
    }
    grouped
}
