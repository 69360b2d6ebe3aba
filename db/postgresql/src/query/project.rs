use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{Executor, Pool, Postgres};
use uuid::Uuid;

use crate::{
    db::{PostgresDb, PostgresTx},
    model::project::ProjectModel,
};

const INSERT: &str = "INSERT INTO \"projects\" (\"id\", \"created_at\", \"updated_at\", \"title\", \"brief_desc\", \"full_desc\", \"date_launched\", \"links\", \"images\", \"status\", \"type\", \"featured\", \"deleted_at\") VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)";
const SELECT: &str = "SELECT \"id\", \"created_at\", \"updated_at\", \"title\", \"brief_desc\", \"full_desc\", \"date_launched\", \"links\", \"images\", \"status\", \"type\", \"featured\", \"deleted_at\" FROM \"projects\" WHERE \"id\" = $1";
const SELECT_FOR_UPDATE: &str = "SELECT \"id\", \"created_at\", \"updated_at\", \"title\", \"brief_desc\", \"full_desc\", \"date_launched\", \"links\", \"images\", \"status\", \"type\", \"featured\", \"deleted_at\" FROM \"projects\" WHERE \"id\" = $1 FOR UPDATE";
const SELECT_MANY: &str = "SELECT \"id\", \"created_at\", \"updated_at\", \"title\", \"brief_desc\", \"full_desc\", \"date_launched\", \"links\", \"images\", \"status\", \"type\", \"featured\", \"deleted_at\" FROM \"projects\"";
const COUNT_MANY: &str = "SELECT COUNT(1) FROM \"projects\"";
const UPDATE: &str = "UPDATE \"projects\" SET \"updated_at\" = $1, \"title\" = $2, \"brief_desc\" = $3, \"full_desc\" = $4, \"date_launched\" = $5, \"links\" = $6, \"images\" = $7, \"status\" = $8, \"type\" = $9, \"featured\" = $10 WHERE \"id\" = $11 AND \"deleted_at\" IS NULL";
const SOFT_DELETE: &str = "UPDATE \"projects\" SET \"deleted_at\" = $1 WHERE \"id\" = $2 AND \"deleted_at\" IS NULL";

pub async fn init(pool: &Pool<Postgres>) -> Result<()> {
    sd_log::info(Some("🔧"), "[PostgreSQL] Setting up projects table");

    pool.execute("CREATE TABLE IF NOT EXISTS \"projects\" (\"id\" uuid, \"created_at\" timestamptz(6) NOT NULL, \"updated_at\" timestamptz(6) NOT NULL, \"title\" varchar(255) NOT NULL, \"brief_desc\" text NOT NULL, \"full_desc\" text NOT NULL, \"date_launched\" timestamptz(6) NOT NULL, \"links\" jsonb NOT NULL, \"images\" jsonb NOT NULL, \"status\" text NOT NULL CHECK (\"status\" IN ('active', 'not_active', 'upcoming', 'ongoing')), \"type\" text NOT NULL CHECK (\"type\" IN ('internal', 'external', 'cross_orgs')), \"featured\" boolean NOT NULL DEFAULT false, \"deleted_at\" timestamptz(6), PRIMARY KEY (\"id\"))").await?;

    Ok(())
}

impl PostgresDb {
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
        let (filter, count_values) = Self::project_filter(status, kind, featured_only);
        let order = if *ascending { "ASC" } else { "DESC" };
        let sql = format!(
            "{SELECT_MANY}{filter} ORDER BY \"date_launched\" {order}, \"id\" {order} LIMIT ${} OFFSET ${}",
            count_values + 1,
            count_values + 2
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
        let (filter, _) = Self::project_filter(status, kind, featured_only);
        let sql = format!("{COUNT_MANY}{filter}");

        let mut query = sqlx::query_as::<_, (i64,)>(&sql);
        if let Some(status) = status {
            query = query.bind(status);
        }
        if let Some(kind) = kind {
            query = query.bind(kind);
        }

        Ok(self.fetch_one(query).await?.0)
    }

    pub async fn insert_project_tx(tx: &mut PostgresTx, value: &ProjectModel) -> Result<()> {
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

    /// Locks the row until the transaction ends.
    pub async fn select_project_tx(tx: &mut PostgresTx, id: &Uuid) -> Result<Option<ProjectModel>> {
        Ok(sqlx::query_as(SELECT_FOR_UPDATE)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?)
    }

    pub async fn update_project_tx(tx: &mut PostgresTx, value: &ProjectModel) -> Result<u64> {
        Ok(Self::bind_update(value)
            .execute(&mut **tx)
            .await?
            .rows_affected())
    }

    pub async fn soft_delete_project_tx(
        tx: &mut PostgresTx,
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

    fn bind_update(
        value: &ProjectModel,
    ) -> sqlx::query::Query<'_, Postgres, sqlx::postgres::PgArguments> {
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
    ) -> (String, usize) {
        let mut filter = " WHERE \"deleted_at\" IS NULL".to_owned();
        let mut count_values = 0;
        if status.is_some() {
            count_values += 1;
            filter += &format!(" AND \"status\" = ${count_values}");
        }
        if kind.is_some() {
            count_values += 1;
            filter += &format!(" AND \"type\" = ${count_values}");
        }
        if *featured_only {
            filter += " AND \"featured\" = true";
        }
        (filter, count_values)
    }
}
