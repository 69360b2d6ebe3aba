use anyhow::Result;
use sd_db_postgresql::model::member::MemberModel as MemberPostgresModel;
use sd_db_sqlite::model::member::MemberModel as MemberSqliteModel;
use uuid::Uuid;

use crate::Db;

#[derive(Clone, Debug)]
pub struct MemberDao {
    id: Uuid,
    name: String,
    email: String,
    photo: String,
    is_visible: bool,
}

impl MemberDao {
    pub fn new(name: &str, email: &str, photo: &str) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.to_owned(),
            email: email.to_owned(),
            photo: photo.to_owned(),
            // The column defaults to hidden; new members are shown unless
            // an admin hides them later.
            is_visible: true,
        }
    }

    pub fn id(&self) -> &Uuid {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn photo(&self) -> &str {
        &self.photo
    }

    pub fn is_visible(&self) -> &bool {
        &self.is_visible
    }

    pub async fn db_insert(&self, db: &Db) -> Result<()> {
        match db {
            Db::PostgresqlDb(db) => {
                db.insert_member(&MemberPostgresModel::new(
                    &self.id,
                    &self.name,
                    &self.email,
                    &self.photo,
                    &self.is_visible,
                ))
                .await
            }
            Db::SqliteDb(db) => {
                db.insert_member(&MemberSqliteModel::new(
                    &self.id,
                    &self.name,
                    &self.email,
                    &self.photo,
                    &self.is_visible,
                ))
                .await
            }
        }
    }

    pub async fn db_select_many_by_ids(db: &Db, ids: &[Uuid]) -> Result<Vec<Self>> {
        match db {
            Db::PostgresqlDb(db) => Ok(db
                .select_many_members_by_ids(ids)
                .await?
                .iter()
                .map(|model| Self {
                    id: *model.id(),
                    name: model.name().to_owned(),
                    email: model.email().to_owned(),
                    photo: model.photo().to_owned(),
                    is_visible: *model.is_visible(),
                })
                .collect()),
            Db::SqliteDb(db) => Ok(db
                .select_many_members_by_ids(ids)
                .await?
                .iter()
                .map(|model| Self {
                    id: *model.id(),
                    name: model.name().to_owned(),
                    email: model.email().to_owned(),
                    photo: model.photo().to_owned(),
                    is_visible: *model.is_visible(),
                })
                .collect()),
        }
    }
}
