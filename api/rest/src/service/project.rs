use actix_multipart::form::MultipartForm;
use actix_web::{http::StatusCode, web, HttpResponse};

use crate::{
    context::ApiRestCtx,
    model::{
        project::{
            DeleteOneProjectReqPath, FindManyProjectReqQuery, FindOneProjectReqPath,
            InsertOneProjectReqForm, ProjectDetailResJson, ProjectIDResJson, ProjectResJson,
            UpdateOneProjectReqForm, UpdateOneProjectReqPath, UpdateOneProjectResJson,
        },
        PaginationRes, Response,
    },
};

pub fn project_api(cfg: &mut web::ServiceConfig) {
    cfg.route("/projects", web::post().to(insert_one))
        .route("/projects", web::get().to(find_many))
        .route("/projects/{project_id}", web::get().to(find_one))
        .route("/projects/{project_id}", web::patch().to(update_one))
        .route("/projects/{project_id}", web::delete().to(delete_one));
}

async fn insert_one(
    ctx: web::Data<ApiRestCtx>,
    form: MultipartForm<InsertOneProjectReqForm>,
) -> HttpResponse {
    let new_project = match form.to_new_project() {
        Ok(data) => data,
        Err(err) => return Response::error(&err),
    };
    let files = match form.files(ctx.storage().max_file_size()) {
        Ok(files) => files,
        Err(err) => return Response::error(&err),
    };

    match ctx
        .service()
        .project()
        .create(&new_project, &files)
        .await
    {
        Ok(project) => Response::data(&StatusCode::CREATED, &None, ProjectResJson::new(&project)),
        Err(err) => Response::error(&err),
    }
}

async fn find_many(
    ctx: web::Data<ApiRestCtx>,
    query: web::Query<FindManyProjectReqQuery>,
) -> HttpResponse {
    let page = match ctx.service().project().find_many(&query.to_query()).await {
        Ok(page) => page,
        Err(err) => return Response::error(&err),
    };

    Response::data(
        &StatusCode::OK,
        &Some(PaginationRes::new(&page.projects().len(), page.total())),
        page.projects()
            .iter()
            .map(ProjectResJson::new)
            .collect::<Vec<_>>(),
    )
}

async fn find_one(
    ctx: web::Data<ApiRestCtx>,
    path: web::Path<FindOneProjectReqPath>,
) -> HttpResponse {
    match ctx.service().project().find_one(path.project_id()).await {
        Ok(detail) => Response::data(
            &StatusCode::OK,
            &None,
            ProjectDetailResJson::new(detail.project(), detail.collaborators()),
        ),
        Err(err) => Response::error(&err),
    }
}

async fn update_one(
    ctx: web::Data<ApiRestCtx>,
    path: web::Path<UpdateOneProjectReqPath>,
    form: MultipartForm<UpdateOneProjectReqForm>,
) -> HttpResponse {
    let patch = match form.to_patch() {
        Ok(patch) => patch,
        Err(err) => return Response::error(&err),
    };
    let files = match form.files(ctx.storage().max_file_size()) {
        Ok(files) => files,
        Err(err) => return Response::error(&err),
    };

    let updated = match ctx
        .service()
        .project()
        .update(path.project_id(), &patch, &files)
        .await
    {
        Ok(updated) => updated,
        Err(err) => return Response::error(&err),
    };

    let message = if updated.failed_uploads().is_empty() {
        "Project updated".to_owned()
    } else {
        format!(
            "Project updated, but {} of {} images failed to upload",
            updated.failed_uploads().len(),
            files.len()
        )
    };

    Response::message_data(
        &StatusCode::OK,
        &message,
        UpdateOneProjectResJson::new(updated.project(), updated.failed_uploads()),
    )
}

async fn delete_one(
    ctx: web::Data<ApiRestCtx>,
    path: web::Path<DeleteOneProjectReqPath>,
) -> HttpResponse {
    match ctx.service().project().remove(path.project_id()).await {
        Ok(_) => Response::data(
            &StatusCode::OK,
            &None,
            ProjectIDResJson::new(path.project_id()),
        ),
        Err(err) => Response::error(&err),
    }
}
