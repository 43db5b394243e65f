use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::error::StoreError;

/// Error returned by HTTP handlers; rendered as `{"detail": message}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("profile not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Store(StoreError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Store(StoreError::DuplicateName(_)) => StatusCode::BAD_REQUEST,
            Self::Store(_) | Self::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = axum::Json(serde_json::json!({ "detail": self.to_string() }));
        (status, body).into_response()
    }
}
