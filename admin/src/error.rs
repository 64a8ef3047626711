use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::client::RequestError;
use crate::schema::UnknownField;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Insufficient permissions")]
    Forbidden,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Remote request failed: {0}")]
    Remote(#[from] RequestError),
}

impl From<UnknownField> for AppError {
    fn from(e: UnknownField) -> Self {
        AppError::BadRequest(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            AppError::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Remote(e) => {
                // the remote message is what the page banner shows
                tracing::warn!(status = ?e.status(), "Remote error: {}", e);
                (StatusCode::BAD_GATEWAY, e.message().to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
