use std::sync::Arc;

use actix_web::{
    http::{header, StatusCode},
    middleware::ErrorHandlers,
    test, web, App,
};
use sd_api_rest::{
    configure,
    context::{ApiRestCtx, ApiRestServiceCtx, ApiRestStorageCtx, ApiRestTokenCtx},
    default_error_handler, multipart_config,
};
use sd_dao::Db;
use sd_db_sqlite::db::SqliteDb;
use sd_service::{project::ProjectService, retry::RetryPolicy};
use sd_storage::{local::LocalObjectStore, ObjectStore};
use sd_token_jwt::token::JwtToken;
use serde_json::Value;

const BOUNDARY: &str = "sysdev-test-boundary";
const PUBLIC_URL: &str = "http://localhost:8080/storage";
const MAX_FILE_SIZE: usize = 1024 * 1024;

async fn context(dir: &tempfile::TempDir) -> web::Data<ApiRestCtx> {
    let path = dir.path().to_string_lossy().to_string();
    let db = Arc::new(Db::SqliteDb(SqliteDb::new(":memory:", &1).await.unwrap()));
    let jwt = Arc::new(JwtToken::new("secret"));
    let store: Arc<dyn ObjectStore> =
        Arc::new(LocalObjectStore::new(&path, PUBLIC_URL, jwt.clone()));

    web::Data::new(ApiRestCtx::new(
        ApiRestServiceCtx::new(ProjectService::new(
            db,
            store,
            "project-images",
            &RetryPolicy::new(&1, &std::time::Duration::from_millis(1)),
        )),
        ApiRestTokenCtx::new(jwt),
        ApiRestStorageCtx::new(&path, &["project-images".to_owned()], &MAX_FILE_SIZE),
    ))
}

macro_rules! app {
    ($ctx:expr) => {
        test::init_service(
            App::new()
                .wrap(ErrorHandlers::new().default_handler(default_error_handler))
                .app_data($ctx.clone())
                .app_data(multipart_config(&MAX_FILE_SIZE))
                .configure(configure),
        )
        .await
    };
}

fn multipart(fields: &[(&str, &str)], files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    for (file_name, data) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"{file_name}\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn multipart_request(req: test::TestRequest, body: Vec<u8>) -> test::TestRequest {
    req.insert_header((
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
    ))
    .set_payload(body)
}

const PROJECT_FIELDS: [(&str, &str); 7] = [
    ("title", "Website"),
    ("brief_desc", "Org website"),
    ("full_desc", "The organization website"),
    ("date_launched", "2024-01-15"),
    ("status", "active"),
    ("type", "internal"),
    ("links", r#"[{"name":"GitHub","link":"https://github.com/sysdev/website"}]"#),
];

#[actix_web::test]
async fn liveness_routes_answer() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(&dir).await;
    let app = app!(ctx);

    for uri in ["/", "/api", "/api/rest"] {
        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}

#[actix_web::test]
async fn project_lifecycle_over_http() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(&dir).await;
    let app = app!(ctx);

    let req = multipart_request(
        test::TestRequest::post().uri("/api/rest/projects"),
        multipart(&PROJECT_FIELDS, &[("cover.png", &b"cover"[..]), ("shot.png", &b"shot"[..])]),
    );
    let res = test::call_service(&app, req.to_request()).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(res).await;
    let id = created["data"]["id"].as_str().unwrap().to_owned();
    let images = created["data"]["images"].as_array().unwrap().clone();
    assert_eq!(images.len(), 2);
    assert_eq!(created["data"]["type"], "internal");

    let cover_path = images[0]
        .as_str()
        .unwrap()
        .strip_prefix("http://localhost:8080")
        .unwrap()
        .to_owned();
    let res = test::call_service(&app, test::TestRequest::get().uri(&cover_path).to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(test::read_body(res).await.as_ref(), &b"cover"[..]);

    let keep = serde_json::to_string(&[images[0].clone()]).unwrap();
    let req = multipart_request(
        test::TestRequest::patch().uri(&format!("/api/rest/projects/{id}")),
        multipart(&[("title", "Portal"), ("images", keep.as_str())], &[("new.png", &b"new"[..])]),
    );
    let res = test::call_service(&app, req.to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(res).await;
    assert_eq!(updated["message"], "Project updated");
    assert_eq!(updated["data"]["project"]["title"], "Portal");
    assert_eq!(updated["data"]["project"]["images"].as_array().unwrap().len(), 2);
    assert_eq!(updated["data"]["failedUploads"].as_array().unwrap().len(), 0);

    let shot_path = images[1]
        .as_str()
        .unwrap()
        .strip_prefix("http://localhost:8080")
        .unwrap()
        .to_owned();
    let res = test::call_service(&app, test::TestRequest::get().uri(&shot_path).to_request()).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/rest/projects/{id}"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let detail: Value = test::read_body_json(res).await;
    assert_eq!(detail["data"]["title"], "Portal");
    assert!(detail["data"]["collaborators"].as_object().unwrap().is_empty());

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/rest/projects?type=internal&sort=yearAsc")
            .to_request(),
    )
    .await;
    let list: Value = test::read_body_json(res).await;
    assert_eq!(list["pagination"]["total"], 1);

    let delete = || {
        test::TestRequest::delete()
            .uri(&format!("/api/rest/projects/{id}"))
            .to_request()
    };
    assert_eq!(test::call_service(&app, delete()).await.status(), StatusCode::OK);
    let res = test::call_service(&app, delete()).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["error"]["status"], "Conflict");
}

#[actix_web::test]
async fn unknown_image_reference_is_a_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(&dir).await;
    let app = app!(ctx);

    let req = multipart_request(
        test::TestRequest::post().uri("/api/rest/projects"),
        multipart(&PROJECT_FIELDS, &[("cover.png", &b"cover"[..])]),
    );
    let created: Value = test::read_body_json(test::call_service(&app, req.to_request()).await).await;
    let id = created["data"]["id"].as_str().unwrap().to_owned();

    let req = multipart_request(
        test::TestRequest::patch().uri(&format!("/api/rest/projects/{id}")),
        multipart(&[("images", r#"["https://elsewhere/x.png"]"#)], &[]),
    );
    let res = test::call_service(&app, req.to_request()).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(
        body["error"]["message"],
        "payload references unknown image: https://elsewhere/x.png"
    );
}

#[actix_web::test]
async fn create_without_files_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(&dir).await;
    let app = app!(ctx);

    let req = multipart_request(
        test::TestRequest::post().uri("/api/rest/projects"),
        multipart(&PROJECT_FIELDS, &[]),
    );
    let res = test::call_service(&app, req.to_request()).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn list_limit_is_bounded_and_unknown_ids_are_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(&dir).await;
    let app = app!(ctx);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/rest/projects?limit=101")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/rest/projects/{}", uuid::Uuid::now_v7()))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn private_objects_need_a_signed_token() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(&dir).await;
    let app = app!(ctx);

    std::fs::create_dir_all(dir.path().join("private")).unwrap();
    std::fs::write(dir.path().join("private").join("cv.pdf"), &b"cv"[..]).unwrap();

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/storage/private/cv.pdf").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let token = ctx
        .token()
        .jwt()
        .encode("private", "cv.pdf", &std::time::Duration::from_secs(60))
        .unwrap();
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/storage/private/cv.pdf?token={token}"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
}
