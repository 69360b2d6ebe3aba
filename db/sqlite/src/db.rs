use anyhow::Result;
use itertools::Itertools;
use sqlx::{
    query::{Query, QueryAs},
    sqlite::{SqliteArguments, SqlitePoolOptions, SqliteQueryResult, SqliteRow},
    Error, Pool, Sqlite, Transaction,
};

use crate::query::{collaborator, collaborator_assignment, member, organization, project, role};

pub type SqliteTx = Transaction<'static, Sqlite>;

pub struct SqliteDb {
    pool: Pool<Sqlite>,
}

impl SqliteDb {
    /// `path` may be `:memory:` for a private in-memory database.
    pub async fn new(path: &str, max_connections: &u32) -> Result<Self> {
        sd_log::info(Some("⚡"), "[SQLite] Initializing component");

        let url = format!("sqlite:{path}?mode=rwc");
        let pool = SqlitePoolOptions::new()
            .max_connections(*max_connections)
            .connect(&url)
            .await?;

        Self::init(&pool).await?;

        Ok(Self { pool })
    }

    pub async fn begin(&self) -> Result<SqliteTx, Error> {
        self.pool.begin().await
    }

    pub async fn execute<'a>(
        &self,
        query: Query<'a, Sqlite, SqliteArguments<'a>>,
    ) -> Result<SqliteQueryResult, Error> {
        query.execute(&self.pool).await
    }

    pub async fn fetch_one<'a, T: Send + Unpin + for<'r> sqlx::FromRow<'r, SqliteRow>>(
        &self,
        query: QueryAs<'a, Sqlite, T, SqliteArguments<'a>>,
    ) -> Result<T, Error> {
        query.fetch_one(&self.pool).await
    }

    pub async fn fetch_optional<'a, T: Send + Unpin + for<'r> sqlx::FromRow<'r, SqliteRow>>(
        &self,
        query: QueryAs<'a, Sqlite, T, SqliteArguments<'a>>,
    ) -> Result<Option<T>, Error> {
        query.fetch_optional(&self.pool).await
    }

    pub async fn fetch_all<'a, T: Send + Unpin + for<'r> sqlx::FromRow<'r, SqliteRow>>(
        &self,
        query: QueryAs<'a, Sqlite, T, SqliteArguments<'a>>,
    ) -> Result<Vec<T>, Error> {
        query.fetch_all(&self.pool).await
    }

    async fn init(pool: &Pool<Sqlite>) -> Result<()> {
        project::init(pool).await?;
        role::init(pool).await?;
        member::init(pool).await?;
        organization::init(pool).await?;
        collaborator::init(pool).await?;
        collaborator_assignment::init(pool).await
    }
}

/// `"?, ?, ?"` for `len` bind parameters.
pub(crate) fn placeholders(len: usize) -> String {
    std::iter::repeat("?").take(len).join(", ")
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use sqlx::types::Json;
    use uuid::Uuid;

    use super::*;
    use crate::model::project::{ProjectLinkModel, ProjectModel};

    fn project(title: &str, launched_days_ago: i64, featured: bool) -> ProjectModel {
        let now = Utc::now();
        ProjectModel::new(
            &Uuid::now_v7(),
            &now,
            &now,
            title,
            "brief",
            "full",
            &(now - Duration::days(launched_days_ago)),
            &Json(vec![ProjectLinkModel::new("GitHub", "https://github.com/x")]),
            &Json(vec!["http://localhost/storage/images/a.png".to_owned()]),
            "active",
            "internal",
            &featured,
            &None,
        )
    }

    #[test]
    fn builds_placeholder_list() {
        assert_eq!(placeholders(0), "");
        assert_eq!(placeholders(1), "?");
        assert_eq!(placeholders(3), "?, ?, ?");
    }

    #[tokio::test]
    async fn project_rows_survive_a_round_trip_and_soft_delete() {
        let db = SqliteDb::new(":memory:", &1).await.unwrap();
        let older = project("older", 30, false);
        let newer = project("newer", 1, true);

        let mut tx = db.begin().await.unwrap();
        SqliteDb::insert_project_tx(&mut tx, &older).await.unwrap();
        SqliteDb::insert_project_tx(&mut tx, &newer).await.unwrap();
        tx.commit().await.unwrap();

        let stored = db.select_project(older.id()).await.unwrap().unwrap();
        assert_eq!(stored.title(), "older");
        assert_eq!(stored.links().0[0].name(), "GitHub");
        assert_eq!(stored.images().0.len(), 1);

        let newest_first = db
            .select_many_projects(&None, &None, &false, &false, &10, &0)
            .await
            .unwrap();
        let titles: Vec<&str> = newest_first.iter().map(|p| p.title()).collect();
        assert_eq!(titles, vec!["newer", "older"]);

        let featured = db.count_many_projects(&None, &None, &true).await.unwrap();
        assert_eq!(featured, 1);

        let mut tx = db.begin().await.unwrap();
        let affected = SqliteDb::soft_delete_project_tx(&mut tx, older.id(), &Utc::now())
            .await
            .unwrap();
        tx.commit().await.unwrap();
        assert_eq!(affected, 1);

        let live = db.count_many_projects(&None, &None, &false).await.unwrap();
        assert_eq!(live, 1);
        assert!(db
            .select_project(older.id())
            .await
            .unwrap()
            .unwrap()
            .deleted_at()
            .is_some());
    }
}
