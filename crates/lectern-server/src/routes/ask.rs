//! Question answering over uploaded documents.

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use lectern_chat::AnswerResult;
use lectern_core::Error;
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/ask", get(ask))
}

#[derive(Deserialize)]
struct AskQuery {
    question: String,
}

/// GET /ask?question=... — structured answer with its source.
async fn ask(
    State(state): State<Arc<AppState>>,
    query: Result<Query<AskQuery>, QueryRejection>,
) -> Result<Json<AnswerResult>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let answerer = state.answerer.as_ref().ok_or_else(|| {
        Error::Config("no LLM provider configured; set GEMINI_API_KEY or OPENAI_API_KEY".into())
    })?;

    let result = answerer.answer(&query.question).await?;
    Ok(Json(result))
}
