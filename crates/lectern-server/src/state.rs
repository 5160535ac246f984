//! Shared application state.

use std::sync::Arc;

use lectern_chat::{Answerer, StructuredModel};
use lectern_core::QaConfig;
use lectern_infer::EmbedderBackend;
use lectern_store::SegmentStore;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: QaConfig,
    pub store: Arc<SegmentStore>,
    pub embedder: Arc<dyn EmbedderBackend>,
    /// `None` when no LLM provider has a key.
    pub answerer: Option<Answerer>,
}

impl AppState {
    pub fn new(
        config: QaConfig,
        store: Arc<SegmentStore>,
        embedder: Arc<dyn EmbedderBackend>,
        model: Option<Arc<dyn StructuredModel>>,
    ) -> Self {
        let answerer = model.map(|model| {
            Answerer::new(store.clone(), embedder.clone(), model, config.top_k)
        });
        Self {
            config,
            store,
            embedder,
            answerer,
        }
    }
}
