use anyhow::Result;
use sqlx::{
    postgres::{PgArguments, PgPoolOptions, PgQueryResult, PgRow},
    query::{Query, QueryAs},
    Error, Pool, Postgres, Transaction,
};

use crate::query::{collaborator, collaborator_assignment, member, organization, project, role};

pub type PostgresTx = Transaction<'static, Postgres>;

pub struct PostgresDb {
    pool: Pool<Postgres>,
}

impl PostgresDb {
    pub async fn new(
        user: &str,
        password: &str,
        host: &str,
        port: &str,
        db_name: &str,
        max_connections: &u32,
    ) -> Result<Self> {
        sd_log::info(Some("⚡"), "[PostgreSQL] Initializing component");

        let url = format!("postgres://{user}:{password}@{host}:{port}/{db_name}");
        let pool = PgPoolOptions::new()
            .max_connections(*max_connections)
            .connect(&url)
            .await?;

        Self::init(&pool).await?;

        Ok(Self { pool })
    }

    pub async fn begin(&self) -> Result<PostgresTx, Error> {
        self.pool.begin().await
    }

    pub async fn execute(
        &self,
        query: Query<'_, Postgres, PgArguments>,
    ) -> Result<PgQueryResult, Error> {
        query.execute(&self.pool).await
    }

    pub async fn fetch_one<T: Send + Unpin + for<'r> sqlx::FromRow<'r, PgRow>>(
        &self,
        query: QueryAs<'_, Postgres, T, PgArguments>,
    ) -> Result<T, Error> {
        query.fetch_one(&self.pool).await
    }

    pub async fn fetch_optional<T: Send + Unpin + for<'r> sqlx::FromRow<'r, PgRow>>(
        &self,
        query: QueryAs<'_, Postgres, T, PgArguments>,
    ) -> Result<Option<T>, Error> {
        query.fetch_optional(&self.pool).await
    }

    pub async fn fetch_all<T: Send + Unpin + for<'r> sqlx::FromRow<'r, PgRow>>(
        &self,
        query: QueryAs<'_, Postgres, T, PgArguments>,
    ) -> Result<Vec<T>, Error> {
        query.fetch_all(&self.pool).await
    }

    async fn init(pool: &Pool<Postgres>) -> Result<()> {
        // Referenced tables first.
        project::init(pool).await?;
        role::init(pool).await?;
        member::init(pool).await?;
        organization::init(pool).await?;
        collaborator::init(pool).await?;
        collaborator_assignment::init(pool).await
    }
}
