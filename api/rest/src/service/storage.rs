use std::path::Path;

use actix_files::NamedFile;
use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};
use sd_storage::object::check_segment;

use crate::{
    context::ApiRestCtx,
    model::{
        storage::{FindOneObjectReqPath, FindOneObjectReqQuery},
        Response,
    },
};

pub fn storage_api(cfg: &mut web::ServiceConfig) {
    cfg.route("/storage/{bucket}/{key}", web::get().to(find_one));
}

async fn find_one(
    ctx: web::Data<ApiRestCtx>,
    req: HttpRequest,
    path: web::Path<FindOneObjectReqPath>,
    query: web::Query<FindOneObjectReqQuery>,
) -> HttpResponse {
    if check_segment(path.bucket()).is_err() || check_segment(path.key()).is_err() {
        return Response::error_raw(&StatusCode::BAD_REQUEST, "Invalid object path");
    }

    if !ctx.storage().is_public(path.bucket()) {
        let token = match query.token() {
            Some(token) => token,
            None => {
                return Response::error_raw(
                    &StatusCode::UNAUTHORIZED,
                    "A signed token is required to read this object",
                )
            }
        };
        match ctx.token().jwt().decode(token) {
            Ok(claim) if claim.grants(path.bucket(), path.key()) => {}
            Ok(_) => {
                return Response::error_raw(
                    &StatusCode::FORBIDDEN,
                    "Token does not grant access to this object",
                )
            }
            Err(err) => return Response::error_raw(&StatusCode::UNAUTHORIZED, &err.to_string()),
        }
    }

    let file_path = Path::new(ctx.storage().path())
        .join(path.bucket())
        .join(path.key());
    match NamedFile::open_async(&file_path).await {
        Ok(file) => file.into_response(&req),
        Err(_) => Response::error_raw(&StatusCode::NOT_FOUND, "Object not found"),
    }
}
