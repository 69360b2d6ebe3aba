use std::sync::Arc;

use sd_api_rest::{
    context::{ApiRestCtx, ApiRestServiceCtx, ApiRestStorageCtx, ApiRestTokenCtx},
    ApiRestServer,
};
use sd_dao::Db;
use sd_db_postgresql::db::PostgresDb;
use sd_db_sqlite::db::SqliteDb;
use sd_service::{project::ProjectService, retry::RetryPolicy};
use sd_storage::{local::LocalObjectStore, ObjectStore};
use sd_token_jwt::token::JwtToken;
use tokio_util::sync::CancellationToken;

mod config_path;

#[tokio::main]
async fn main() {
    let config_path = config_path::get();
    let config = match sd_config::from_path(&config_path) {
        Ok(config) => config,
        Err(err) => sd_log::panic(None, format!("[Sysdev] Failed to read config: {err}")),
    };

    if let Err(err) = sd_log::init(config.log().display_level(), config.log().level_filter()) {
        sd_log::panic(None, format!("[Sysdev] Failed to initialize logger: {err}"));
    }

    sd_log::info(Some("🚀"), "[Sysdev] Starting");

    let db = if let Some(postgres) = config.db().postgres() {
        match PostgresDb::new(
            postgres.user(),
            postgres.password(),
            postgres.host(),
            postgres.port(),
            postgres.db_name(),
            postgres.max_connections(),
        )
        .await
        {
            Ok(db) => Arc::new(Db::PostgresqlDb(db)),
            Err(err) => sd_log::panic(
                None,
                format!("[Sysdev] Initializing PostgreSQL failed: {err}"),
            ),
        }
    } else if let Some(sqlite) = config.db().sqlite() {
        match SqliteDb::new(sqlite.path(), sqlite.max_connections()).await {
            Ok(db) => Arc::new(Db::SqliteDb(db)),
            Err(err) => sd_log::panic(None, format!("[Sysdev] Initializing SQLite failed: {err}")),
        }
    } else {
        sd_log::panic(None, "[Sysdev] No database configuration is specified");
    };

    let jwt_token = Arc::new(JwtToken::new(config.token().jwt().secret()));

    let config_storage = config.storage();
    let object_store: Arc<dyn ObjectStore> = Arc::new(LocalObjectStore::new(
        config_storage.path(),
        config_storage.public_url(),
        jwt_token.clone(),
    ));

    let project_service = ProjectService::new(
        db,
        object_store,
        config_storage.image_bucket(),
        &RetryPolicy::new(
            config_storage.retry().retries(),
            config_storage.retry().delay(),
        ),
    );

    let api_rest_server = ApiRestServer::new(
        config.app().mode(),
        config.api().rest().host(),
        config.api().rest().port(),
        config.api().rest().allowed_origin(),
        ApiRestCtx::new(
            ApiRestServiceCtx::new(project_service),
            ApiRestTokenCtx::new(jwt_token),
            ApiRestStorageCtx::new(
                config_storage.path(),
                config_storage.public_buckets(),
                config_storage.max_file_size(),
            ),
        ),
    );

    let cancel_token = CancellationToken::new();

    match api_rest_server.run(cancel_token.clone()).await {
        Ok(_) => sd_log::info(Some("👋"), "[Sysdev] Turned off"),
        Err(err) => {
            cancel_token.cancel();
            sd_log::warn(
                Some("👋"),
                format!("[Sysdev] Turned off with error: {err}"),
            );
        }
    }
}
