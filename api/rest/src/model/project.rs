use std::str::FromStr;

use actix_multipart::form::{bytes::Bytes, text::Text, MultipartForm};
use ahash::HashMap;
use chrono::{DateTime, NaiveDate, Utc};
use sd_dao::{
    member::MemberDao,
    organization::OrganizationDao,
    project::{ProjectDao, ProjectKind, ProjectLink, ProjectStatus},
};
use sd_error::Error;
use sd_service::{
    collaborator::CollaboratorsByRole,
    image::FailedUpload,
    project::{NewProject, ProjectPatch, ProjectQuery},
};
use sd_storage::UploadFile;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(MultipartForm)]
pub struct InsertOneProjectReqForm {
    title: Text<String>,
    brief_desc: Text<String>,
    full_desc: Text<String>,
    date_launched: Text<String>,
    status: Text<String>,
    #[multipart(rename = "type")]
    kind: Text<String>,
    featured: Option<Text<bool>>,
    links: Option<Text<String>>,
    files: Vec<Bytes>,
}

impl InsertOneProjectReqForm {
    pub fn to_new_project(&self) -> Result<NewProject, Error> {
        ProjectTextReq {
            title: Some(self.title.0.clone()),
            brief_desc: Some(self.brief_desc.0.clone()),
            full_desc: Some(self.full_desc.0.clone()),
        }
        .validate()
        .map_err(|err| Error::Validation(err.to_string()))?;

        Ok(NewProject {
            title: self.title.0.clone(),
            brief_desc: self.brief_desc.0.clone(),
            full_desc: self.full_desc.0.clone(),
            date_launched: parse_date(&self.date_launched)?,
            status: parse_status(&self.status)?,
            kind: parse_kind(&self.kind)?,
            featured: self.featured.as_ref().is_some_and(|featured| featured.0),
            links: match &self.links {
                Some(links) => parse_links(links)?,
                None => Vec::new(),
            },
        })
    }

    pub fn files(&self, max_file_size: &usize) -> Result<Vec<UploadFile>, Error> {
        upload_files(&self.files, max_file_size)
    }
}

/// Every text field is optional. `images` is a JSON array of the stored
/// URLs to keep.
#[derive(MultipartForm)]
pub struct UpdateOneProjectReqForm {
    title: Option<Text<String>>,
    brief_desc: Option<Text<String>>,
    full_desc: Option<Text<String>>,
    date_launched: Option<Text<String>>,
    status: Option<Text<String>>,
    #[multipart(rename = "type")]
    kind: Option<Text<String>>,
    featured: Option<Text<bool>>,
    links: Option<Text<String>>,
    images: Option<Text<String>>,
    files: Vec<Bytes>,
}

impl UpdateOneProjectReqForm {
    pub fn to_patch(&self) -> Result<ProjectPatch, Error> {
        ProjectTextReq {
            title: self.title.as_ref().map(|title| title.0.clone()),
            brief_desc: self.brief_desc.as_ref().map(|desc| desc.0.clone()),
            full_desc: self.full_desc.as_ref().map(|desc| desc.0.clone()),
        }
        .validate()
        .map_err(|err| Error::Validation(err.to_string()))?;

        Ok(ProjectPatch {
            title: self.title.as_ref().map(|title| title.0.clone()),
            brief_desc: self.brief_desc.as_ref().map(|desc| desc.0.clone()),
            full_desc: self.full_desc.as_ref().map(|desc| desc.0.clone()),
            date_launched: self.date_launched.as_ref().map(|d| parse_date(d)).transpose()?,
            status: self.status.as_ref().map(|s| parse_status(s)).transpose()?,
            kind: self.kind.as_ref().map(|k| parse_kind(k)).transpose()?,
            featured: self.featured.as_ref().map(|featured| featured.0),
            links: self.links.as_ref().map(|l| parse_links(l)).transpose()?,
            images: self.images.as_ref().map(|i| parse_images(i)).transpose()?,
        })
    }

    pub fn files(&self, max_file_size: &usize) -> Result<Vec<UploadFile>, Error> {
        upload_files(&self.files, max_file_size)
    }
}

#[derive(Validate)]
struct ProjectTextReq {
    #[validate(length(min = 1, message = "title must not be empty"))]
    title: Option<String>,
    #[validate(length(min = 1, message = "brief_desc must not be empty"))]
    brief_desc: Option<String>,
    #[validate(length(min = 1, message = "full_desc must not be empty"))]
    full_desc: Option<String>,
}

#[derive(Deserialize, Validate)]
struct ProjectLinkReqJson {
    #[validate(length(min = 1, message = "link name must not be empty"))]
    name: String,
    #[validate(url(message = "link must be a valid URL"))]
    link: String,
}

/// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_date(value: &str) -> Result<DateTime<Utc>, Error> {
    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Ok(date.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|date| date.and_utc())
        .ok_or_else(|| Error::Validation(format!("Invalid date_launched '{value}'")))
}

fn parse_status(value: &str) -> Result<ProjectStatus, Error> {
    ProjectStatus::from_str(value)
        .map_err(|_| Error::Validation(format!("Invalid status '{value}'")))
}

fn parse_kind(value: &str) -> Result<ProjectKind, Error> {
    ProjectKind::from_str(value).map_err(|_| Error::Validation(format!("Invalid type '{value}'")))
}

fn parse_links(value: &str) -> Result<Vec<ProjectLink>, Error> {
    let links: Vec<ProjectLinkReqJson> = serde_json::from_str(value)
        .map_err(|err| Error::Validation(format!("Invalid links: {err}")))?;
    links
        .iter()
        .map(|link| {
            link.validate()
                .map_err(|err| Error::Validation(err.to_string()))?;
            Ok(ProjectLink::new(&link.name, &link.link))
        })
        .collect()
}

fn parse_images(value: &str) -> Result<Vec<String>, Error> {
    serde_json::from_str(value).map_err(|err| Error::Validation(format!("Invalid images: {err}")))
}

fn upload_files(files: &[Bytes], max_file_size: &usize) -> Result<Vec<UploadFile>, Error> {
    files
        .iter()
        // A form field left without a selected file arrives nameless and empty.
        .filter(|file| !(file.data.is_empty() && file.file_name.as_deref().unwrap_or("").is_empty()))
        .map(|file| {
            let name = file.file_name.as_deref().unwrap_or("image");
            if file.data.is_empty() {
                return Err(Error::Validation(format!("File {name} is empty")));
            }
            if file.data.len() > *max_file_size {
                return Err(Error::Validation(format!(
                    "File {name} exceeds the maximum size of {max_file_size} bytes"
                )));
            }
            if let Some(content_type) = &file.content_type {
                if content_type.type_() != mime::IMAGE {
                    return Err(Error::Validation(format!("File {name} is not an image")));
                }
            }
            Ok(UploadFile::new(
                name,
                &file.content_type.as_ref().map(|mime| mime.to_string()),
                file.data.to_vec(),
            ))
        })
        .collect()
}

#[derive(Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum ProjectSort {
    #[serde(rename = "yearDesc")]
    YearDesc,
    #[serde(rename = "yearAsc")]
    YearAsc,
}

#[derive(Deserialize)]
pub struct FindManyProjectReqQuery {
    sort: Option<ProjectSort>,
    status: Option<ProjectStatus>,
    #[serde(rename = "type")]
    kind: Option<ProjectKind>,
    featured: Option<bool>,
    page: Option<u32>,
    limit: Option<u32>,
}

impl FindManyProjectReqQuery {
    pub fn to_query(&self) -> ProjectQuery {
        let default = ProjectQuery::default();
        ProjectQuery {
            status: self.status,
            kind: self.kind,
            featured_only: self.featured.unwrap_or(false),
            ascending: self.sort == Some(ProjectSort::YearAsc),
            page: self.page.unwrap_or(default.page),
            limit: self.limit.unwrap_or(default.limit),
        }
    }
}

#[derive(Deserialize)]
pub struct FindOneProjectReqPath {
    project_id: Uuid,
}

impl FindOneProjectReqPath {
    pub fn project_id(&self) -> &Uuid {
        &self.project_id
    }
}

#[derive(Deserialize)]
pub struct UpdateOneProjectReqPath {
    project_id: Uuid,
}

impl UpdateOneProjectReqPath {
    pub fn project_id(&self) -> &Uuid {
        &self.project_id
    }
}

#[derive(Deserialize)]
pub struct DeleteOneProjectReqPath {
    project_id: Uuid,
}

impl DeleteOneProjectReqPath {
    pub fn project_id(&self) -> &Uuid {
        &self.project_id
    }
}

#[derive(Serialize)]
pub struct ProjectResJson {
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
    #[serde(rename = "type")]
    kind: ProjectKind,
    featured: bool,
}

impl ProjectResJson {
    pub fn new(project: &ProjectDao) -> Self {
        Self {
            id: *project.id(),
            created_at: *project.created_at(),
            updated_at: *project.updated_at(),
            title: project.title().to_owned(),
            brief_desc: project.brief_desc().to_owned(),
            full_desc: project.full_desc().to_owned(),
            date_launched: *project.date_launched(),
            links: project.links().clone(),
            images: project.images().clone(),
            status: *project.status(),
            kind: *project.kind(),
            featured: *project.featured(),
        }
    }
}

#[derive(Serialize)]
pub struct ProjectDetailResJson {
    #[serde(flatten)]
    project: ProjectResJson,
    collaborators: HashMap<String, RoleCollaboratorsResJson>,
}

impl ProjectDetailResJson {
    pub fn new(project: &ProjectDao, collaborators: &CollaboratorsByRole) -> Self {
        Self {
            project: ProjectResJson::new(project),
            collaborators: collaborators
                .iter()
                .map(|(role, group)| {
                    (
                        role.to_owned(),
                        RoleCollaboratorsResJson {
                            members: group.members().iter().map(MemberResJson::new).collect(),
                            organizations: group
                                .organizations()
                                .iter()
                                .map(OrganizationResJson::new)
                                .collect(),
                        },
                    )
                })
                .collect(),
        }
    }
}

#[derive(Serialize)]
pub struct RoleCollaboratorsResJson {
    members: Vec<MemberResJson>,
    organizations: Vec<OrganizationResJson>,
}

#[derive(Serialize)]
pub struct MemberResJson {
    id: Uuid,
    name: String,
    email: String,
    photo: String,
}

impl MemberResJson {
    pub fn new(member: &MemberDao) -> Self {
        Self {
            id: *member.id(),
            name: member.name().to_owned(),
            email: member.email().to_owned(),
            photo: member.photo().to_owned(),
        }
    }
}

#[derive(Serialize)]
pub struct OrganizationResJson {
    id: Uuid,
    name: String,
    description: String,
    logo: Option<String>,
}

impl OrganizationResJson {
    pub fn new(organization: &OrganizationDao) -> Self {
        Self {
            id: *organization.id(),
            name: organization.name().to_owned(),
            description: organization.description().to_owned(),
            logo: organization.logo().clone(),
        }
    }
}

#[derive(Serialize)]
pub struct UpdateOneProjectResJson {
    project: ProjectResJson,
    #[serde(rename = "failedUploads")]
    failed_uploads: Vec<FailedUploadResJson>,
}

impl UpdateOneProjectResJson {
    pub fn new(project: &ProjectDao, failed_uploads: &[FailedUpload]) -> Self {
        Self {
            project: ProjectResJson::new(project),
            failed_uploads: failed_uploads
                .iter()
                .map(|failed| FailedUploadResJson {
                    file_name: failed.file_name().to_owned(),
                    reason: failed.reason().to_owned(),
                })
                .collect(),
        }
    }
}

#[derive(Serialize)]
pub struct FailedUploadResJson {
    #[serde(rename = "fileName")]
    file_name: String,
    reason: String,
}

#[derive(Serialize)]
pub struct ProjectIDResJson {
    id: Uuid,
}

impl ProjectIDResJson {
    pub fn new(id: &Uuid) -> Self {
        Self { id: *id }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    #[test]
    fn parses_plain_and_rfc3339_dates() {
        let date = parse_date("2024-02-29").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2024, 2, 29));
        assert_eq!(date.hour(), 0);

        let date = parse_date("2024-02-29T10:30:00+02:00").unwrap();
        assert_eq!(date.hour(), 8);

        assert!(matches!(parse_date("29/02/2024"), Err(Error::Validation(_))));
    }

    #[test]
    fn links_must_carry_a_url() {
        let links = parse_links(r#"[{"name":"GitHub","link":"https://github.com/sysdev"}]"#)
            .unwrap();
        assert_eq!(links, vec![ProjectLink::new("GitHub", "https://github.com/sysdev")]);

        assert!(parse_links(r#"[{"name":"GitHub","link":"not a url"}]"#).is_err());
        assert!(parse_links(r#"{"name":"GitHub"}"#).is_err());
    }

    fn part(name: Option<&str>, data: &'static [u8]) -> Bytes {
        Bytes {
            data: actix_web::web::Bytes::from_static(data),
            content_type: Some(mime::IMAGE_PNG),
            file_name: name.map(str::to_owned),
        }
    }

    #[test]
    fn empty_named_file_is_rejected() {
        let err = upload_files(&[part(Some("cover.png"), b"png"), part(Some("blank.png"), b"")], &1024)
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(err.to_string().contains("blank.png"));
    }

    #[test]
    fn unselected_file_field_is_skipped() {
        let files = upload_files(&[part(None, b""), part(Some(""), b""), part(Some("cover.png"), b"png")], &1024)
            .unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name(), "cover.png");
    }

    #[test]
    fn enum_fields_reject_unknown_names() {
        assert_eq!(parse_status("not_active").unwrap(), ProjectStatus::NotActive);
        assert!(parse_kind("partner").is_err());
    }
}
