use actix_web::web;

use crate::service::{project::project_api, root::root_api, storage::storage_api};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(root_api)
        .configure(storage_api)
        .service(web::scope("/api/rest").configure(project_api));
}
