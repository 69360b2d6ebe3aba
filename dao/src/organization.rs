use anyhow::Result;
use sd_db_postgresql::model::organization::OrganizationModel as OrganizationPostgresModel;
use sd_db_sqlite::model::organization::OrganizationModel as OrganizationSqliteModel;
use uuid::Uuid;

use crate::Db;

#[derive(Clone, Debug)]
pub struct OrganizationDao {
    id: Uuid,
    name: String,
    description: String,
    logo: Option<String>,
}

impl OrganizationDao {
    pub fn new(name: &str, description: &str, logo: &Option<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
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

    pub async fn db_insert(&self, db: &Db) -> Result<()> {
        match db {
            Db::PostgresqlDb(db) => {
                db.insert_organization(&OrganizationPostgresModel::new(
                    &self.id,
                    &self.name,
                    &self.description,
                    &self.logo,
                ))
                .await
            }
            Db::SqliteDb(db) => {
                db.insert_organization(&OrganizationSqliteModel::new(
                    &self.id,
                    &self.name,
                    &self.description,
                    &self.logo,
                ))
                .await
            }
        }
    }

    pub async fn db_select_many_by_ids(db: &Db, ids: &[Uuid]) -> Result<Vec<Self>> {
        match db {
            Db::PostgresqlDb(db) => Ok(db
                .select_many_organizations_by_ids(ids)
                .await?
                .iter()
                .map(|model| Self {
                    id: *model.id(),
                    name: model.name().to_owned(),
                    description: model.description().to_owned(),
                    logo: model.logo().clone(),
                })
                .collect()),
            Db::SqliteDb(db) => Ok(db
                .select_many_organizations_by_ids(ids)
                .await?
                .iter()
                .map(|model| Self {
                    id: *model.id(),
                    name: model.name().to_owned(),
                    description: model.description().to_owned(),
                    logo: model.logo().clone(),
                })
                .collect()),
        }
    }
}
