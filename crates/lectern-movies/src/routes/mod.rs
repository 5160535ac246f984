//! HTTP route handlers.

pub mod index;
pub mod select;

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(index::routes())
        .merge(select::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
