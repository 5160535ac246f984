//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use lectern_core::Error;
use tracing::error;

/// Every failure is reported as 400 with a `detail` message.
#[derive(Debug)]
pub struct ApiError {
    detail: String,
}

impl ApiError {
    pub fn bad_request(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        error!("Bad request: {}", detail);
        Self { detail }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        error!("Request failed: {:?}", err);
        Self {
            detail: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "detail": self.detail })),
        )
            .into_response()
    }
}
