//! Error page rendering.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use lectern_core::Error;
use tracing::error;

use crate::html::escape_html;

/// A request-time failure, shown as a 500 page.
#[derive(Debug)]
pub struct PageError(Error);

impl From<Error> for PageError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        error!("Page failed: {:?}", self.0);
        let body = format!(
            "<!doctype html><html><head><title>Error</title></head>\
             <body><h1>Something went wrong</h1><p>{}</p></body></html>",
            escape_html(&self.0.to_string())
        );
        (StatusCode::INTERNAL_SERVER_ERROR, Html(body)).into_response()
    }
}
