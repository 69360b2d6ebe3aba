use actix_web::{http::StatusCode, HttpResponse, HttpResponseBuilder};
use sd_error::Error;
use serde::Serialize;

pub mod project;
pub mod storage;

#[derive(Serialize)]
pub struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorRes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pagination: Option<PaginationRes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
}

impl Response {
    pub fn data<T: Serialize>(
        status_code: &StatusCode,
        pagination: &Option<PaginationRes>,
        data: T,
    ) -> HttpResponse {
        Self::build(status_code, &None, pagination, data)
    }

    pub fn message_data<T: Serialize>(
        status_code: &StatusCode,
        message: &str,
        data: T,
    ) -> HttpResponse {
        Self::build(status_code, &Some(message.to_owned()), &None, data)
    }

    fn build<T: Serialize>(
        status_code: &StatusCode,
        message: &Option<String>,
        pagination: &Option<PaginationRes>,
        data: T,
    ) -> HttpResponse {
        match serde_json::to_value(data) {
            Ok(data) => HttpResponseBuilder::new(*status_code).json(Self {
                error: None,
                message: message.clone(),
                pagination: *pagination,
                data: Some(data),
            }),
            Err(err) => Self::error(&Error::internal("Failed to serialize response", err)),
        }
    }

    pub fn error(err: &Error) -> HttpResponse {
        let status_code = match err {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::ExternalService(_) => StatusCode::BAD_GATEWAY,
            Error::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status_code.is_server_error() {
            sd_log::error(None, err.diagnostic());
        }

        Self::error_raw(&status_code, &err.to_string())
    }

    pub fn error_raw(status_code: &StatusCode, message: &str) -> HttpResponse {
        sd_log::debug(None, format!("[ApiRestServer] {status_code}: {message}"));

        HttpResponseBuilder::new(*status_code).json(Self {
            error: Some(ErrorRes {
                status: match status_code.canonical_reason() {
                    Some(status_code) => status_code.to_owned(),
                    None => "Unknown".to_owned(),
                },
                message: message.to_owned(),
            }),
            message: None,
            pagination: None,
            data: None,
        })
    }
}

#[derive(Serialize)]
pub struct ErrorRes {
    status: String,
    message: String,
}

#[derive(Serialize, Clone, Copy)]
pub struct PaginationRes {
    count: usize,
    total: i64,
}

impl PaginationRes {
    pub fn new(count: &usize, total: &i64) -> Self {
        Self {
            count: *count,
            total: *total,
        }
    }
}
