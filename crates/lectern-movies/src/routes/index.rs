//! The recommendation page.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use lectern_recommend::PageView;
use serde::Deserialize;

use crate::error::PageError;
use crate::html::render_page;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(index))
}

#[derive(Deserialize)]
struct PageQuery {
    /// 1-based.
    page: Option<usize>,
}

/// GET /?page=N — selected movie and its recommendations.
async fn index(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, PageError> {
    let selected = state.selection.current();
    let view = PageView::build(
        &state.table,
        &state.recommender,
        selected,
        state.config.recommendations,
    )?;

    Ok(Html(render_page(
        &state.table,
        &view,
        query.page.unwrap_or(1),
        state.config.page_size,
    )))
}
