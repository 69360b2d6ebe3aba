use anyhow::Result;
use sd_db_postgresql::model::role::RoleModel as RolePostgresModel;
use sd_db_sqlite::model::role::RoleModel as RoleSqliteModel;
use uuid::Uuid;

use crate::Db;

pub struct RoleDao {
    id: Uuid,
    name: String,
}

impl RoleDao {
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.to_owned(),
        }
    }

    pub fn id(&self) -> &Uuid {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn db_insert(&self, db: &Db) -> Result<()> {
        match db {
            Db::PostgresqlDb(db) => {
                db.insert_role(&RolePostgresModel::new(&self.id, &self.name))
                    .await
            }
            Db::SqliteDb(db) => db.insert_role(&RoleSqliteModel::new(&self.id, &self.name)).await,
        }
    }

    pub async fn db_select_by_name(db: &Db, name: &str) -> Result<Option<Self>> {
        match db {
            Db::PostgresqlDb(db) => Ok(db
                .select_role_by_name(name)
                .await?
                .map(|model| Self::from_model(model.id(), model.name()))),
            Db::SqliteDb(db) => Ok(db
                .select_role_by_name(name)
                .await?
                .map(|model| Self::from_model(model.id(), model.name()))),
        }
    }

    pub async fn db_select_many_by_ids(db: &Db, ids: &[Uuid]) -> Result<Vec<Self>> {
        match db {
            Db::PostgresqlDb(db) => Ok(db
                .select_many_roles_by_ids(ids)
                .await?
                .iter()
                .map(|model| Self::from_model(model.id(), model.name()))
                .collect()),
            Db::SqliteDb(db) => Ok(db
                .select_many_roles_by_ids(ids)
                .await?
                .iter()
                .map(|model| Self::from_model(model.id(), model.name()))
                .collect()),
        }
    }

    fn from_model(id: &Uuid, name: &str) -> Self {
        Self {
            id: *id,
            name: name.to_owned(),
        }
    }
}
