use axum::{http::StatusCode, response::IntoResponse, Json};

use crate::JsonResponse;

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("{0}")]
    Unauthenticated(&'static str),
    #[error("Forbidden")]
    Forbidden,
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(&'static str),
    #[error("{0}")]
    Validation(String),
    #[error("internal error: {0}")]
    Internal(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(serde::Serialize)]
pub struct RequestErrorJsonWrapper {
    errors: RequestErrorJson,
}

#[derive(serde::Serialize)]
pub struct RequestErrorJson {
    body: Vec<String>,
}

impl RequestErrorJsonWrapper {
    pub fn new(error: &str) -> RequestErrorJsonWrapper {
        RequestErrorJsonWrapper {
            errors: RequestErrorJson {
                body: vec![error.to_string()],
            },
        }
    }
}

impl From<anyhow::Error> for RequestError {
    fn from(value: anyhow::Error) -> Self {
        Self::Internal(format!("{:#}", value))
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> axum::response::Response {
        self.to_json_response().into_response()
    }
}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            RequestError::Forbidden => StatusCode::FORBIDDEN,
            RequestError::NotFound(_) => StatusCode::NOT_FOUND,
            RequestError::Conflict(_) => StatusCode::CONFLICT,
            RequestError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            RequestError::Internal(_) | RequestError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn to_json_response(&self) -> JsonResponse<RequestErrorJsonWrapper> {
        let json = match self {
            RequestError::Internal(_) | RequestError::Database(_) => {
                tracing::error!("{}", self);
                RequestErrorJsonWrapper::new("Internal Server Error")
            }
            other => RequestErrorJsonWrapper::new(&other.to_string()),
        };
        (self.status_code(), Json(json))
    }
}

/// Maps a unique-constraint failure to `Conflict`, passing every other error through.
pub fn conflict_on_unique(error: sqlx::Error, message: &'static str) -> RequestError {
    if let sqlx::Error::Database(e) = &error {
        if e.message().contains("UNIQUE constraint failed") {
            return RequestError::Conflict(message);
        }
    }
    RequestError::Database(error)
}
