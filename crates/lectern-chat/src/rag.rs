//! Retrieval plus structured generation.

use std::sync::Arc;

use lectern_core::{Error, Result};
use lectern_infer::EmbedderBackend;
use lectern_store::{ScoredSegment, SegmentStore};
use tracing::{debug, info};

use crate::prompt::{build_context, render_prompt};
use crate::providers::StructuredModel;
use crate::types::AnswerResult;

/// Answers questions from the segments in a store.
pub struct Answerer {
    store: Arc<SegmentStore>,
    embedder: Arc<dyn EmbedderBackend>,
    model: Arc<dyn StructuredModel>,
    top_k: usize,
}

impl Answerer {
    pub fn new(
        store: Arc<SegmentStore>,
        embedder: Arc<dyn EmbedderBackend>,
        model: Arc<dyn StructuredModel>,
        top_k: usize,
    ) -> Self {
        Self {
            store,
            embedder,
            model,
            top_k,
        }
    }

    /// The `top_k` nearest segments to `question`, nearest first.
    ///
    /// An empty store yields an empty list.
    pub async fn retrieve(&self, question: &str) -> Result<Vec<ScoredSegment>> {
        let store = self.store.clone();
        let embedder = self.embedder.clone();
        let question = question.to_string();
        let k = self.top_k;

        // Embedding is CPU-bound
        tokio::task::spawn_blocking(move || {
            let query = embedder.embed(&question)?;
            store.search(&query.embedding, k)
        })
        .await
        .map_err(|e| Error::Embedding(format!("retrieval task failed: {}", e)))?
    }

    /// Retrieve context for `question` and ask the model for a structured answer.
    pub async fn answer(&self, question: &str) -> Result<AnswerResult> {
        let hits = self.retrieve(question).await?;
        let context = build_context(&hits);
        debug!("Answering with {} context segments", context.len());

        let prompt = render_prompt(&context, question)?;
        let raw = self.model.generate(&prompt).await?;
        let result = AnswerResult::from_model_output(raw)?;

        info!(
            "Answered via {} (source: {} p.{})",
            self.model.model_name(),
            result.filename.as_deref().unwrap_or("-"),
            result.page_no.map(|p| p.to_string()).unwrap_or_else(|| "-".into())
        );
        Ok(result)
    }
}
