//! Liveness route.

use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(hello))
}

/// GET / — fixed greeting.
async fn hello() -> Json<Value> {
    Json(json!({ "message": "Hello World" }))
}
