use std::sync::Arc;

use chrono::{DateTime, Utc};
use sd_dao::{
    project::{ProjectDao, ProjectFilters, ProjectKind, ProjectLink, ProjectPagination, ProjectStatus},
    Db,
};
use sd_error::{Error, Result};
use sd_storage::{ObjectStore, UploadFile};
use uuid::Uuid;

use crate::{
    collaborator::{self, CollaboratorsByRole},
    image::{self, FailedUpload, ImagePlan},
    retry::RetryPolicy,
};

pub struct NewProject {
    pub title: String,
    pub brief_desc: String,
    pub full_desc: String,
    pub date_launched: DateTime<Utc>,
    pub status: ProjectStatus,
    pub kind: ProjectKind,
    pub featured: bool,
    pub links: Vec<ProjectLink>,
}

/// Fields left as `None` keep their stored value. `images` is the list of
/// stored URLs to retain; anything stored but not listed is deleted.
#[derive(Default)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub brief_desc: Option<String>,
    pub full_desc: Option<String>,
    pub date_launched: Option<DateTime<Utc>>,
    pub status: Option<ProjectStatus>,
    pub kind: Option<ProjectKind>,
    pub featured: Option<bool>,
    pub links: Option<Vec<ProjectLink>>,
    pub images: Option<Vec<String>>,
}

pub struct ProjectQuery {
    pub status: Option<ProjectStatus>,
    pub kind: Option<ProjectKind>,
    pub featured_only: bool,
    pub ascending: bool,
    pub page: u32,
    pub limit: u32,
}

impl Default for ProjectQuery {
    fn default() -> Self {
        Self {
            status: None,
            kind: None,
            featured_only: false,
            ascending: false,
            page: 1,
            limit: 10,
        }
    }
}

#[derive(Debug)]
pub struct ProjectPage {
    projects: Vec<ProjectDao>,
    total: i64,
}

impl ProjectPage {
    pub fn projects(&self) -> &Vec<ProjectDao> {
        &self.projects
    }

    pub fn total(&self) -> &i64 {
        &self.total
    }
}

#[derive(Debug)]
pub struct ProjectDetail {
    project: ProjectDao,
    collaborators: CollaboratorsByRole,
}

impl ProjectDetail {
    pub fn project(&self) -> &ProjectDao {
        &self.project
    }

    pub fn collaborators(&self) -> &CollaboratorsByRole {
        &self.collaborators
    }
}

#[derive(Debug)]
pub struct UpdatedProject {
    project: ProjectDao,
    failed_uploads: Vec<FailedUpload>,
}

impl UpdatedProject {
    pub fn project(&self) -> &ProjectDao {
        &self.project
    }

    pub fn failed_uploads(&self) -> &Vec<FailedUpload> {
        &self.failed_uploads
    }
}

pub struct ProjectService {
    db: Arc<Db>,
    store: Arc<dyn ObjectStore>,
    image_bucket: String,
    retry_policy: RetryPolicy,
}

impl ProjectService {
    pub fn new(
        db: Arc<Db>,
        store: Arc<dyn ObjectStore>,
        image_bucket: &str,
        retry_policy: &RetryPolicy,
    ) -> Self {
        sd_log::info(Some("⚡"), "[ProjectService] Initializing component");

        Self {
            db,
            store,
            image_bucket: image_bucket.to_owned(),
            retry_policy: *retry_policy,
        }
    }

    pub fn db(&self) -> &Db {
        &self.db
    }

    pub async fn create(&self, new_project: &NewProject, files: &[UploadFile]) -> Result<ProjectDao> {
        if files.is_empty() {
            return Err(Error::Validation(
                "At least one image file is required".to_owned(),
            ));
        }

        let outcome =
            image::upload_all(self.store.as_ref(), &self.image_bucket, &self.retry_policy, files)
                .await;
        if let Some(failed) = outcome.failed().first() {
            self.discard(outcome.uploaded()).await;
            return Err(Error::ExternalService(format!(
                "Failed to upload {}: {}",
                failed.file_name(),
                failed.reason()
            )));
        }

        let project = ProjectDao::new(
            &new_project.title,
            &new_project.brief_desc,
            &new_project.full_desc,
            &new_project.date_launched,
            &new_project.links,
            outcome.uploaded(),
            &new_project.status,
            &new_project.kind,
            &new_project.featured,
        );

        if let Err(err) = self.insert(&project).await {
            self.discard(outcome.uploaded()).await;
            return Err(err);
        }

        sd_log::info(
            None,
            format!("[ProjectService] Created project {}", project.id()),
        );
        Ok(project)
    }

    pub async fn find_many(&self, query: &ProjectQuery) -> Result<ProjectPage> {
        let pagination = ProjectPagination::new(&query.page, &query.limit)
            .map_err(|err| Error::Validation(err.to_string()))?;
        let filters = ProjectFilters::new(
            &query.status,
            &query.kind,
            &query.featured_only,
            &query.ascending,
        );

        let (projects, total) = ProjectDao::db_select_many(&self.db, &filters, &pagination)
            .await
            .map_err(|err| Error::internal("Failed to list projects", err))?;

        Ok(ProjectPage { projects, total })
    }

    pub async fn find_one(&self, id: &Uuid) -> Result<ProjectDetail> {
        let project = ProjectDao::db_select(&self.db, id)
            .await
            .map_err(|err| Error::internal("Failed to load project", err))?
            .filter(|project| !project.is_deleted())
            .ok_or_else(|| not_found(id))?;

        let collaborators = collaborator::collaborators_by_role(&self.db, id)
            .await
            .map_err(|err| Error::internal("Failed to load project collaborators", err))?;

        Ok(ProjectDetail {
            project,
            collaborators,
        })
    }

    /// Reconciles images and writes the patch.
    ///
    /// Loading, validating and writing the patch happen in one transaction.
    /// Uploads and deletions run after it commits and are never rolled back.
    pub async fn update(
        &self,
        id: &Uuid,
        patch: &ProjectPatch,
        files: &[UploadFile],
    ) -> Result<UpdatedProject> {
        let mut tx = self
            .db
            .begin()
            .await
            .map_err(|err| Error::internal("Failed to start transaction", err))?;

        let mut project = ProjectDao::db_select_tx(&mut tx, id)
            .await
            .map_err(|err| Error::internal("Failed to load project", err))?
            .ok_or_else(|| not_found(id))?;
        if project.is_deleted() {
            return Err(deleted(id));
        }

        let plan = ImagePlan::new(project.images(), patch.images.as_deref())?;

        let mut changed = apply_patch(&mut project, patch);
        if plan.retained() != project.images() {
            project.set_images(plan.retained());
            changed = true;
        }

        if changed {
            project
                .db_update_tx(&mut tx)
                .await
                .map_err(|err| Error::internal("Failed to update project", err))?;
            tx.commit()
                .await
                .map_err(|err| Error::internal("Failed to commit project update", err))?;
        } else {
            tx.rollback()
                .await
                .map_err(|err| Error::internal("Failed to close transaction", err))?;
        }

        let (outcome, deleted_count) = tokio::join!(
            image::upload_all(self.store.as_ref(), &self.image_bucket, &self.retry_policy, files),
            image::delete_all(self.store.as_ref(), &self.retry_policy, plan.removed()),
        );
        if deleted_count < plan.removed().len() {
            sd_log::warn(
                None,
                format!(
                    "[ProjectService] Project {id}: {} of {} removed images are still stored",
                    plan.removed().len() - deleted_count,
                    plan.removed().len()
                ),
            );
        }

        if !outcome.uploaded().is_empty() {
            project = match self.append_images(id, outcome.uploaded()).await {
                Ok(project) => project,
                Err(err) => {
                    self.discard(outcome.uploaded()).await;
                    return Err(err);
                }
            };
        }

        Ok(UpdatedProject {
            project,
            failed_uploads: outcome.failed().clone(),
        })
    }

    /// Soft delete. Stored images are left in place.
    pub async fn remove(&self, id: &Uuid) -> Result<()> {
        let mut tx = self
            .db
            .begin()
            .await
            .map_err(|err| Error::internal("Failed to start transaction", err))?;

        let project = ProjectDao::db_select_tx(&mut tx, id)
            .await
            .map_err(|err| Error::internal("Failed to load project", err))?
            .ok_or_else(|| not_found(id))?;
        if project.is_deleted() {
            return Err(deleted(id));
        }

        let removed = ProjectDao::db_soft_delete_tx(&mut tx, id)
            .await
            .map_err(|err| Error::internal("Failed to delete project", err))?;
        if !removed {
            return Err(deleted(id));
        }
        tx.commit()
            .await
            .map_err(|err| Error::internal("Failed to commit project deletion", err))?;

        sd_log::info(None, format!("[ProjectService] Removed project {id}"));
        Ok(())
    }

    async fn insert(&self, project: &ProjectDao) -> Result<()> {
        let mut tx = self
            .db
            .begin()
            .await
            .map_err(|err| Error::internal("Failed to start transaction", err))?;
        project
            .db_insert_tx(&mut tx)
            .await
            .map_err(|err| Error::internal("Failed to insert project", err))?;
        tx.commit()
            .await
            .map_err(|err| Error::internal("Failed to commit project", err))
    }

    /// Appends to the images stored now, not to the list read before the
    /// uploads, so writes committed in the meantime survive.
    async fn append_images(&self, id: &Uuid, uploaded: &[String]) -> Result<ProjectDao> {
        let mut tx = self
            .db
            .begin()
            .await
            .map_err(|err| Error::internal("Failed to start transaction", err))?;

        let mut project = ProjectDao::db_select_tx(&mut tx, id)
            .await
            .map_err(|err| Error::internal("Failed to load project", err))?
            .ok_or_else(|| not_found(id))?;
        if project.is_deleted() {
            return Err(deleted(id));
        }

        let mut images = project.images().clone();
        images.extend(uploaded.iter().cloned());
        project.set_images(&images);
        project
            .db_update_tx(&mut tx)
            .await
            .map_err(|err| Error::internal("Failed to save uploaded images", err))?;
        tx.commit()
            .await
            .map_err(|err| Error::internal("Failed to commit uploaded images", err))?;

        Ok(project)
    }

    async fn discard(&self, urls: &[String]) {
        if urls.is_empty() {
            return;
        }
        image::delete_all(self.store.as_ref(), &self.retry_policy, urls).await;
    }
}

/// Returns whether any field actually changed.
fn apply_patch(project: &mut ProjectDao, patch: &ProjectPatch) -> bool {
    let mut changed = false;
    if let Some(title) = &patch.title {
        if title != project.title() {
            project.set_title(title);
            changed = true;
        }
    }
    if let Some(brief_desc) = &patch.brief_desc {
        if brief_desc != project.brief_desc() {
            project.set_brief_desc(brief_desc);
            changed = true;
        }
    }
    if let Some(full_desc) = &patch.full_desc {
        if full_desc != project.full_desc() {
            project.set_full_desc(full_desc);
            changed = true;
        }
    }
    if let Some(date_launched) = &patch.date_launched {
        if date_launched != project.date_launched() {
            project.set_date_launched(date_launched);
            changed = true;
        }
    }
    if let Some(status) = &patch.status {
        if status != project.status() {
            project.set_status(status);
            changed = true;
        }
    }
    if let Some(kind) = &patch.kind {
        if kind != project.kind() {
            project.set_kind(kind);
            changed = true;
        }
    }
    if let Some(featured) = &patch.featured {
        if featured != project.featured() {
            project.set_featured(featured);
            changed = true;
        }
    }
    if let Some(links) = &patch.links {
        if links != project.links() {
            project.set_links(links);
            changed = true;
        }
    }
    changed
}

fn not_found(id: &Uuid) -> Error {
    Error::NotFound(format!("Project {id} not found"))
}

fn deleted(id: &Uuid) -> Error {
    Error::Conflict(format!("Project {id} has already been deleted"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> ProjectDao {
        ProjectDao::new(
            "Website",
            "Brief",
            "Full",
            &Utc::now(),
            &[],
            &["a".to_owned()],
            &ProjectStatus::Active,
            &ProjectKind::Internal,
            &false,
        )
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let mut project = project();
        assert!(!apply_patch(&mut project, &ProjectPatch::default()));
    }

    #[test]
    fn patch_with_same_values_changes_nothing() {
        let mut project = project();
        let patch = ProjectPatch {
            title: Some("Website".to_owned()),
            status: Some(ProjectStatus::Active),
            ..Default::default()
        };
        assert!(!apply_patch(&mut project, &patch));
    }

    #[test]
    fn patch_overwrites_given_fields_only() {
        let mut project = project();
        let patch = ProjectPatch {
            title: Some("Portal".to_owned()),
            featured: Some(true),
            links: Some(vec![ProjectLink::new("repo", "https://git.example.com")]),
            ..Default::default()
        };

        assert!(apply_patch(&mut project, &patch));
        assert_eq!(project.title(), "Portal");
        assert!(*project.featured());
        assert_eq!(project.brief_desc(), "Brief");
        assert_eq!(project.links().len(), 1);
    }
}
