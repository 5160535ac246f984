//! Selection changes.

use std::sync::Arc;

use axum::extract::{Form, State};
use axum::response::Redirect;
use axum::routing::post;
use axum::Router;
use serde::Deserialize;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/select", post(select))
}

#[derive(Deserialize)]
struct SelectForm {
    id: i64,
}

/// POST /select — make `id` the current movie, then re-render.
async fn select(State(state): State<Arc<AppState>>, Form(form): Form<SelectForm>) -> Redirect {
    // Unknown ids leave the selection unchanged
    state.selection.select(&state.table, form.id);
    Redirect::to("/")
}
