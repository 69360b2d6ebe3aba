use actix_cors::Cors;
use actix_multipart::form::MultipartFormConfig;
use actix_web::{
    middleware::{ErrorHandlers, Logger},
    web, App, HttpServer,
};
use context::ApiRestCtx;
use sd_config::app::AppConfigMode;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub use configure::configure;
pub use error_handler::default_error_handler;

mod configure;
pub mod context;
mod error_handler;
mod model;
mod service;

/// Upper bound on files accepted in one multipart request.
const MAX_FILES_PER_REQUEST: usize = 16;

pub fn multipart_config(max_file_size: &usize) -> MultipartFormConfig {
    let limit = max_file_size * MAX_FILES_PER_REQUEST;
    MultipartFormConfig::default()
        .memory_limit(limit)
        .total_limit(limit)
}

pub struct ApiRestServer {
    mode: AppConfigMode,
    address: String,
    allowed_origin: Option<String>,
    context: web::Data<ApiRestCtx>,
}

impl ApiRestServer {
    pub fn new(
        mode: &AppConfigMode,
        host: &str,
        port: &u16,
        allowed_origin: &Option<String>,
        ctx: ApiRestCtx,
    ) -> Self {
        sd_log::info(Some("⚡"), "[ApiRestServer] Initializing component");

        Self {
            mode: *mode,
            address: format!("{host}:{port}"),
            allowed_origin: allowed_origin.clone(),
            context: web::Data::new(ctx),
        }
    }

    pub fn run(self, cancel_token: CancellationToken) -> JoinHandle<()> {
        sd_log::info(Some("💫"), "[ApiRestServer] Running component");

        tokio::spawn(async move {
            let Self {
                mode,
                address,
                allowed_origin,
                context,
            } = self;

            let server = match HttpServer::new(move || {
                let cors = match (mode, &allowed_origin) {
                    (AppConfigMode::Development, _) => Cors::permissive(),
                    (AppConfigMode::Production, Some(origin)) => Cors::default()
                        .allowed_origin(origin)
                        .allow_any_method()
                        .allow_any_header(),
                    (AppConfigMode::Production, None) => Cors::default(),
                };

                App::new()
                    .wrap(cors)
                    .wrap(Logger::default())
                    .wrap(ErrorHandlers::new().default_handler(default_error_handler))
                    .app_data(context.clone())
                    .app_data(multipart_config(context.storage().max_file_size()))
                    .configure(configure)
            })
            .bind(&address)
            {
                Ok(server) => server.run(),
                Err(err) => {
                    sd_log::error(
                        None,
                        format!("[ApiRestServer] Failed to bind {address}: {err}"),
                    );
                    cancel_token.cancel();
                    return;
                }
            };

            let handle = server.handle();
            tokio::select! {
                _ = cancel_token.cancelled() => {
                    handle.stop(true).await;
                }
                res = server => {
                    if let Err(err) = res {
                        sd_log::error(None, format!("[ApiRestServer] Stopped with error: {err}"));
                    }
                    cancel_token.cancel();
                }
            }

            sd_log::info(Some("👋"), "[ApiRestServer] Turned off");
        })
    }
}
