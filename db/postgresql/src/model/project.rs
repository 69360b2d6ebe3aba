use serde::{Deserialize, Serialize};
use sqlx::{
    prelude::FromRow,
    types::{
        chrono::{DateTime, Utc},
        Json,
    },
};
use uuid::Uuid;

#[derive(FromRow)]
pub struct ProjectModel {
    id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    title: String,
    brief_desc: String,
    full_desc: String,
    date_launched: DateTime<Utc>,
    links: Json<Vec<ProjectLinkModel>>,
    images: Json<Vec<String>>,
    status: String,
    #[sqlx(rename = "type")]
    kind: String,
    featured: bool,
    deleted_at: Option<DateTime<Utc>>,
}

impl ProjectModel {
    pub fn new(
        id: &Uuid,
        created_at: &DateTime<Utc>,
        updated_at: &DateTime<Utc>,
        title: &str,
        brief_desc: &str,
        full_desc: &str,
        date_launched: &DateTime<Utc>,
        links: &Json<Vec<ProjectLinkModel>>,
        images: &Json<Vec<String>>,
        status: &str,
        kind: &str,
        featured: &bool,
        deleted_at: &Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: *id,
            created_at: *created_at,
            updated_at: *updated_at,
            title: title.to_owned(),
            brief_desc: brief_desc.to_owned(),
            full_desc: full_desc.to_owned(),
            date_launched: *date_launched,
            links: links.clone(),
            images: images.clone(),
            status: status.to_owned(),
            kind: kind.to_owned(),
            featured: *featured,
            deleted_at: *deleted_at,
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

    pub fn links(&self) -> &Json<Vec<ProjectLinkModel>> {
        &self.links
    }

    pub fn images(&self) -> &Json<Vec<String>> {
        &self.images
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn featured(&self) -> &bool {
        &self.featured
    }

    pub fn deleted_at(&self) -> &Option<DateTime<Utc>> {
        &self.deleted_at
    }
}

#[derive(Deserialize, Serialize, Clone)]
pub struct ProjectLinkModel {
    name: String,
    link: String,
}

impl ProjectLinkModel {
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
