use anyhow::Result;
use sd_db_postgresql::db::{PostgresDb, PostgresTx};
use sd_db_sqlite::db::{SqliteDb, SqliteTx};

pub mod collaborator;
pub mod collaborator_assignment;
pub mod member;
pub mod organization;
pub mod project;
pub mod role;

pub enum Db {
    PostgresqlDb(PostgresDb),
    SqliteDb(SqliteDb),
}

impl Db {
    pub async fn begin(&self) -> Result<DbTransaction> {
        match self {
            Self::PostgresqlDb(db) => Ok(DbTransaction::PostgresqlDb(db.begin().await?)),
            Self::SqliteDb(db) => Ok(DbTransaction::SqliteDb(db.begin().await?)),
        }
    }
}

/// An open transaction on one of the backends.
///
/// Dropping it without calling [`DbTransaction::commit`] rolls back.
pub enum DbTransaction {
    PostgresqlDb(PostgresTx),
    SqliteDb(SqliteTx),
}

impl DbTransaction {
    pub async fn commit(self) -> Result<()> {
        match self {
            Self::PostgresqlDb(tx) => tx.commit().await?,
            Self::SqliteDb(tx) => tx.commit().await?,
        }
        Ok(())
    }

    pub async fn rollback(self) -> Result<()> {
        match self {
            Self::PostgresqlDb(tx) => tx.rollback().await?,
            Self::SqliteDb(tx) => tx.rollback().await?,
        }
        Ok(())
    }
}
