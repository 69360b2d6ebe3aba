use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{query::Query, sqlite::SqliteArguments, Executor, Pool, Sqlite};
use uuid::Uuid;

use crate::{
    db::{SqliteDb, SqliteTx},
    model::project::ProjectModel,
};

const INSERT: &str = "INSERT INTO \"projects\" (\"id\", \"created_at\", \"updated_at\", \"title\", \"brief_desc\", \"full_desc\", \"date_launched\", \"links\", \"images\", \"status\", \"type\", \"featured\", \"deleted_at\") VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";
const SELECT: &str = "SELECT \"id\", \"created_at\", \"updated_at\", \"title\", \"brief_desc\", \"full_desc\", \"date_launched\", \"links\", \"images\", \"status\", \"type\", \"featured\", \"deleted_at\" FROM \"projects\" WHERE \"id\" = ?";
const SELECT_MANY: &str = "SELECT \"id\", \"created_at\", \"updated_at\", \"title\", \"brief_desc\", \"full_desc\", \"date_launched\", \"links\", \"images\", \"status\", \"type\", \"featured\", \"deleted_at\" FROM \"projects\"";
const COUNT_MANY: &str = "SELECT COUNT(1) FROM \"projects\"";
const UPDATE: &str = "UPDATE \"projects\" SET \"updated_at\" = ?, \"title\" = ?, \"brief_desc\" = ?, \"full_desc\" = ?, \"date_launched\" = ?, \"links\" = ?, \"images\" = ?, \"status\" = ?, \"type\" = ?, \"featured\" = ? WHERE \"id\" = ? AND \"deleted_at\" IS NULL";
const SOFT_DELETE: &str = "UPDATE \"projects\" SET \"deleted_at\" = ? WHERE \"id\" = ? AND \"deleted_at\" IS NULL";

pub async fn init(pool: &Pool<Sqlite>) -> Result<()> {
    sd_log::info(Some("🔧"), "[SQLite] Setting up projects table");

    pool.execute("CREATE TABLE IF NOT EXISTS \"projects\" (\"id\" blob, \"created_at\" datetime NOT NULL, \"updated_at\" datetime NOT NULL, \"title\" text NOT NULL, \"brief_desc\" text NOT NULL, \"full_desc\" text NOT NULL, \"date_launched\" datetime NOT NULL, \"links\" text NOT NULL, \"images\" text NOT NULL, \"status\" text NOT NULL CHECK (\"status\" IN ('active', 'not_active', 'upcoming', 'ongoing')), \"type\" text NOT NULL CHECK (\"type\" IN ('internal', 'external', 'cross_orgs')), \"featured\" boolean NOT NULL DEFAULT false, \"deleted_at\" datetime, PRIMARY KEY (\"id\"))").await?;

    Ok(())
}

impl SqliteDb {
    pub async fn select_project(&self, id: &Uuid) -> Result<Option<ProjectModel>> {
        Ok(self.fetch_optional(sqlx::query_as(SELECT).bind(id)).await?)
    }

    pub async fn select_many_projects(
        &self,
        status: &Option<String>,
        kind: &Option<String>,
        featured_only: &bool,
        ascending: &bool,
        limit: &i64,
        offset: &i64,
    ) -> Result<Vec<ProjectModel>> {
        let order = if *ascending { "ASC" } else { "DESC" };
        let sql = format!(
            "{SELECT_MANY}{} ORDER BY \"date_launched\" {order}, \"id\" {order} LIMIT ? OFFSET ?",
            Self::project_filter(status, kind, featured_only)
        );

        let mut query = sqlx::query_as(&sql);
        if let Some(status) = status {
            query = query.bind(status);
        }
        if let Some(kind) = kind {
            query = query.bind(kind);
        }
        query = query.bind(limit).bind(offset);

        Ok(self.fetch_all(query).await?)
    }

    pub async fn count_many_projects(
        &self,
        status: &Option<String>,
        kind: &Option<String>,
        featured_only: &bool,
    ) -> Result<i64> {
        let sql = format!(
            "{COUNT_MANY}{}",
            Self::project_filter(status, kind, featured_only)
        );

        let mut query = sqlx::query_as::<_, (i64,)>(&sql);
        if let Some(status) = status {
            query = query.bind(status);
        }
        if let Some(kind) = kind {
            query = query.bind(kind);
        }

        Ok(self.fetch_one(query).await?.0)
    }

    pub async fn insert_project_tx(tx: &mut SqliteTx, value: &ProjectModel) -> Result<()> {
        sqlx::query(INSERT)
            .bind(value.id())
            .bind(value.created_at())
            .bind(value.updated_at())
            .bind(value.title())
            .bind(value.brief_desc())
            .bind(value.full_desc())
            .bind(value.date_launched())
            .bind(value.links())
            .bind(value.images())
            .bind(value.status())
            .bind(value.kind())
            .bind(value.featured())
            .bind(value.deleted_at())
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    // SQLite has no row locks; the write lock is taken by the first write.
    pub async fn select_project_tx(tx: &mut SqliteTx, id: &Uuid) -> Result<Option<ProjectModel>> {
        Ok(sqlx::query_as(SELECT)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?)
    }

    pub async fn update_project_tx(tx: &mut SqliteTx, value: &ProjectModel) -> Result<u64> {
        Ok(Self::bind_update(value)
            .execute(&mut **tx)
            .await?
            .rows_affected())
    }

    pub async fn soft_delete_project_tx(
        tx: &mut SqliteTx,
        id: &Uuid,
        deleted_at: &DateTime<Utc>,
    ) -> Result<u64> {
        Ok(sqlx::query(SOFT_DELETE)
            .bind(deleted_at)
            .bind(id)
            .execute(&mut **tx)
            .await?
            .rows_affected())
    }

    fn bind_update(value: &ProjectModel) -> Query<'_, Sqlite, SqliteArguments<'_>> {
        sqlx::query(UPDATE)
            .bind(value.updated_at())
            .bind(value.title())
            .bind(value.brief_desc())
            .bind(value.full_desc())
            .bind(value.date_launched())
            .bind(value.links())
            .bind(value.images())
            .bind(value.status())
            .bind(value.kind())
            .bind(value.featured())
            .bind(value.id())
    }

    fn project_filter(
        status: &Option<String>,
        kind: &Option<String>,
        featured_only: &bool,
    ) -> String {
        let mut filter = " WHERE \"deleted_at\" IS NULL".to_owned();
        if status.is_some() {
            filter += " AND \"status\" = ?";
        }
        if kind.is_some() {
            filter += " AND \"type\" = ?";
        }
        if *featured_only {
            filter += " AND \"featured\" = 1";
        }
        filter
    }
}
