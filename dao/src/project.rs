use std::str::FromStr;

use anyhow::{Error, Result};
use chrono::{DateTime, Utc};
use sd_db_postgresql::{
    db::PostgresDb,
    model::project::{ProjectLinkModel as ProjectLinkPostgresModel, ProjectModel as ProjectPostgresModel},
};
use sd_db_sqlite::{
    db::SqliteDb,
    model::project::{ProjectLinkModel as ProjectLinkSqliteModel, ProjectModel as ProjectSqliteModel},
};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use strum_macros::{Display, EnumString};
use uuid::Uuid;

use crate::{Db, DbTransaction};

#[derive(Display, EnumString, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Debug)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Active,
    NotActive,
    Upcoming,
    Ongoing,
}

#[derive(Display, EnumString, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Debug)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProjectKind {
    Internal,
    External,
    CrossOrgs,
}

#[derive(Deserialize, Serialize, Clone, PartialEq, Eq, Debug)]
pub struct ProjectLink {
    name: String,
    link: String,
}

impl ProjectLink {
    pub fn new(name: &str, link: &str) -> Self {
        Self {
            name: name.to_owned(),
            link: link.to_owned(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn link(&self) -> &str {
        &self.link
    }
}

#[derive(Clone, Debug)]
pub struct ProjectDao {
    id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    title: String,
    brief_desc: String,
    full_desc: String,
    date_launched: DateTime<Utc>,
    links: Vec<ProjectLink>,
    images: Vec<String>,
    status: ProjectStatus,
    kind: ProjectKind,
    featured: bool,
    deleted_at: Option<DateTime<Utc>>,
}

impl ProjectDao {
    pub fn new(
        title: &str,
        brief_desc: &str,
        full_desc: &str,
        date_launched: &DateTime<Utc>,
        links: &[ProjectLink],
        images: &[String],
        status: &ProjectStatus,
        kind: &ProjectKind,
        featured: &bool,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            created_at: now,
            updated_at: now,
            title: title.to_owned(),
            brief_desc: brief_desc.to_owned(),
            full_desc: full_desc.to_owned(),
            date_launched: *date_launched,
            links: links.to_vec(),
            images: images.to_vec(),
            status: *status,
            kind: *kind,
            featured: *featured,
            deleted_at: None,
        }
    }

    pub fn id(&self) -> &Uuid {
        &self.id
    }

    pub fn created_at(&self) -> &DateTime<Utc> {
        &self.created_at
    }

    pub fn updated_at(&self) -> &DateTime<Utc> {
        &self.updated_at
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn brief_desc(&self) -> &str {
        &self.brief_desc
    }

    pub fn full_desc(&self) -> &str {
        &self.full_desc
    }

    pub fn date_launched(&self) -> &DateTime<Utc> {
        &self.date_launched
    }

    pub fn links(&self) -> &Vec<ProjectLink> {
        &self.links
    }

    pub fn images(&self) -> &Vec<String> {
        &self.images
    }

    pub fn status(&self) -> &ProjectStatus {
        &self.status
    }

    pub fn kind(&self) -> &ProjectKind {
        &self.kind
    }

    pub fn featured(&self) -> &bool {
        &self.featured
    }

    pub fn deleted_at(&self) -> &Option<DateTime<Utc>> {
        &self.deleted_at
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_owned();
    }

    pub fn set_brief_desc(&mut self, brief_desc: &str) {
        self.brief_desc = brief_desc.to_owned();
    }

    pub fn set_full_desc(&mut self, full_desc: &str) {
        self.full_desc = full_desc.to_owned();
    }

    pub fn set_date_launched(&mut self, date_launched: &DateTime<Utc>) {
        self.date_launched = *date_launched;
    }

    pub fn set_links(&mut self, links: &[ProjectLink]) {
        self.links = links.to_vec();
    }

    pub fn set_images(&mut self, images: &[String]) {
        self.images = images.to_vec();
    }

    pub fn set_status(&mut self, status: &ProjectStatus) {
        self.status = *status;
    }

    pub fn set_kind(&mut self, kind: &ProjectKind) {
        self.kind = *kind;
    }

    pub fn set_featured(&mut self, featured: &bool) {
        self.featured = *featured;
    }

    pub async fn db_insert_tx(&self, tx: &mut DbTransaction) -> Result<()> {
        match tx {
            DbTransaction::PostgresqlDb(tx) => {
                PostgresDb::insert_project_tx(tx, &self.to_postgresdb_model()).await
            }
            DbTransaction::SqliteDb(tx) => {
                SqliteDb::insert_project_tx(tx, &self.to_sqlitedb_model()).await
            }
        }
    }

    /// Soft-deleted rows are returned as well; callers decide what that means.
    pub async fn db_select(db: &Db, id: &Uuid) -> Result<Option<Self>> {
        match db {
            Db::PostgresqlDb(db) => match db.select_project(id).await? {
                Some(model) => Ok(Some(Self::from_postgresdb_model(&model)?)),
                None => Ok(None),
            },
            Db::SqliteDb(db) => match db.select_project(id).await? {
                Some(model) => Ok(Some(Self::from_sqlitedb_model(&model)?)),
                None => Ok(None),
            },
        }
    }

    pub async fn db_select_tx(tx: &mut DbTransaction, id: &Uuid) -> Result<Option<Self>> {
        match tx {
            DbTransaction::PostgresqlDb(tx) => match PostgresDb::select_project_tx(tx, id).await? {
                Some(model) => Ok(Some(Self::from_postgresdb_model(&model)?)),
                None => Ok(None),
            },
            DbTransaction::SqliteDb(tx) => match SqliteDb::select_project_tx(tx, id).await? {
                Some(model) => Ok(Some(Self::from_sqlitedb_model(&model)?)),
                None => Ok(None),
            },
        }
    }

    /// Live projects matching `filters`, plus the total number of matches.
    pub async fn db_select_many(
        db: &Db,
        filters: &ProjectFilters,
        pagination: &ProjectPagination,
    ) -> Result<(Vec<Self>, i64)> {
        let status = filters.status.map(|status| status.to_string());
        let kind = filters.kind.map(|kind| kind.to_string());
        let limit = i64::from(pagination.limit);
        let offset = i64::from(pagination.page - 1) * limit;

        match db {
            Db::PostgresqlDb(db) => {
                let (projects, total) = tokio::try_join!(
                    db.select_many_projects(
                        &status,
                        &kind,
                        &filters.featured_only,
                        &filters.ascending,
                        &limit,
                        &offset
                    ),
                    db.count_many_projects(&status, &kind, &filters.featured_only)
                )?;
                let mut projects_data = Vec::with_capacity(projects.len());
                for project in &projects {
                    projects_data.push(Self::from_postgresdb_model(project)?);
                }
                Ok((projects_data, total))
            }
            Db::SqliteDb(db) => {
                let (projects, total) = tokio::try_join!(
                    db.select_many_projects(
                        &status,
                        &kind,
                        &filters.featured_only,
                        &filters.ascending,
                        &limit,
                        &offset
                    ),
                    db.count_many_projects(&status, &kind, &filters.featured_only)
                )?;
                let mut projects_data = Vec::with_capacity(projects.len());
                for project in &projects {
                    projects_data.push(Self::from_sqlitedb_model(project)?);
                }
                Ok((projects_data, total))
            }
        }
    }

    pub async fn db_update_tx(&mut self, tx: &mut DbTransaction) -> Result<()> {
        self.updated_at = Utc::now();
        let affected = match tx {
            DbTransaction::PostgresqlDb(tx) => {
                PostgresDb::update_project_tx(tx, &self.to_postgresdb_model()).await?
            }
            DbTransaction::SqliteDb(tx) => {
                SqliteDb::update_project_tx(tx, &self.to_sqlitedb_model()).await?
            }
        };
        self.ensure_updated(affected)
    }

    /// Returns `false` when the row was already soft-deleted or is absent.
    pub async fn db_soft_delete_tx(tx: &mut DbTransaction, id: &Uuid) -> Result<bool> {
        let now = Utc::now();
        let affected = match tx {
            DbTransaction::PostgresqlDb(tx) => {
                PostgresDb::soft_delete_project_tx(tx, id, &now).await?
            }
            DbTransaction::SqliteDb(tx) => SqliteDb::soft_delete_project_tx(tx, id, &now).await?,
        };
        Ok(affected > 0)
    }

    fn ensure_updated(&self, affected: u64) -> Result<()> {
        if affected == 0 {
            return Err(Error::msg(format!(
                "Project {} was deleted before it could be updated",
                self.id
            )));
        }
        Ok(())
    }

    fn from_postgresdb_model(model: &ProjectPostgresModel) -> Result<Self> {
        Ok(Self {
            id: *model.id(),
            created_at: *model.created_at(),
            updated_at: *model.updated_at(),
            title: model.title().to_owned(),
            brief_desc: model.brief_desc().to_owned(),
            full_desc: model.full_desc().to_owned(),
            date_launched: *model.date_launched(),
            links: model
                .links()
                .iter()
                .map(|link| ProjectLink::new(link.name(), link.link()))
                .collect(),
            images: model.images().0.clone(),
            status: ProjectStatus::from_str(model.status())?,
            kind: ProjectKind::from_str(model.kind())?,
            featured: *model.featured(),
            deleted_at: *model.deleted_at(),
        })
    }

    fn to_postgresdb_model(&self) -> ProjectPostgresModel {
        ProjectPostgresModel::new(
            &self.id,
            &self.created_at,
            &self.updated_at,
            &self.title,
            &self.brief_desc,
            &self.full_desc,
            &self.date_launched,
            &Json(
                self.links
                    .iter()
                    .map(|link| ProjectLinkPostgresModel::new(&link.name, &link.link))
                    .collect(),
            ),
            &Json(self.images.clone()),
            &self.status.to_string(),
            &self.kind.to_string(),
            &self.featured,
            &self.deleted_at,
        )
    }

    fn from_sqlitedb_model(model: &ProjectSqliteModel) -> Result<Self> {
        Ok(Self {
            id: *model.id(),
            created_at: *model.created_at(),
            updated_at: *model.updated_at(),
            title: model.title().to_owned(),
            brief_desc: model.brief_desc().to_owned(),
            full_desc: model.full_desc().to_owned(),
            date_launched: *model.date_launched(),
            links: model
                .links()
                .iter()
                .map(|link| ProjectLink::new(link.name(), link.link()))
                .collect(),
            images: model.images().0.clone(),
            status: ProjectStatus::from_str(model.status())?,
            kind: ProjectKind::from_str(model.kind())?,
            featured: *model.featured(),
            deleted_at: *model.deleted_at(),
        })
    }

    fn to_sqlitedb_model(&self) -> ProjectSqliteModel {
        ProjectSqliteModel::new(
            &self.id,
            &self.created_at,
            &self.updated_at,
            &self.title,
            &self.brief_desc,
            &self.full_desc,
            &self.date_launched,
            &Json(
                self.links
                    .iter()
                    .map(|link| ProjectLinkSqliteModel::new(&link.name, &link.link))
                    .collect(),
            ),
            &Json(self.images.clone()),
            &self.status.to_string(),
            &self.kind.to_string(),
            &self.featured,
            &self.deleted_at,
        )
    }
}

pub struct ProjectFilters {
    status: Option<ProjectStatus>,
    kind: Option<ProjectKind>,
    featured_only: bool,
    ascending: bool,
}

impl ProjectFilters {
    pub fn new(
        status: &Option<ProjectStatus>,
        kind: &Option<ProjectKind>,
        featured_only: &bool,
        ascending: &bool,
    ) -> Self {
        Self {
            status: *status,
            kind: *kind,
            featured_only: *featured_only,
            ascending: *ascending,
        }
    }
}

/// One-based page of at most `limit` projects.
pub struct ProjectPagination {
    page: u32,
    limit: u32,
}

impl ProjectPagination {
    pub fn new(page: &u32, limit: &u32) -> Result<Self> {
        if *page < 1 {
            return Err(Error::msg("Page must be greater than 0"));
        }
        if !(1..=100).contains(limit) {
            return Err(Error::msg("Limit must be between 1 and 100"));
        }
        Ok(Self {
            page: *page,
            limit: *limit,
        })
    }

    pub fn page(&self) -> &u32 {
        &self.page
    }

    pub fn limit(&self) -> &u32 {
        &self.limit
    }
}
