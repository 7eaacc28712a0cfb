use axum::{
    http::{StatusCode, Uri},
    Json,
};

use crate::errors::RequestError;

mod blog_handlers;
mod comment_handlers;
mod taxonomy_handlers;
mod user_handlers;

pub use blog_handlers::*;
pub use comment_handlers::*;
pub use taxonomy_handlers::*;
pub use user_handlers::*;

type JsonResult<T> = Result<Json<T>, RequestError>;
type CreatedResult<T> = Result<(StatusCode, Json<T>), RequestError>;

// ----------------- Helper Handlers -----------------
pub async fn alive() -> &'static str {
    "alive"
}

pub async fn not_found(uri: Uri) -> Result<(), (StatusCode, String)> {
    Err((
        StatusCode::NOT_FOUND,
        format!("URL {} provided was not found", uri),
    ))
}
