//! Document ingestion pipeline: file → pages → segments → embeddings → store.

use std::path::Path;

use lectern_core::{Error, Result};
use lectern_infer::EmbedderBackend;
use lectern_store::{Segment, SegmentStore};
use tracing::{debug, info};

use crate::chunking::RecursiveSplitter;
use crate::pdf::{self, PageText};

/// Outcome of ingesting one document.
#[derive(Debug, Clone)]
pub struct IngestSummary {
    pub filename: String,
    pub pages: usize,
    pub segment_ids: Vec<String>,
}

/// Handles document ingestion: text extraction, splitting, embedding and storage.
pub struct Ingester<'a> {
    store: &'a SegmentStore,
    embedder: &'a dyn EmbedderBackend,
    splitter: RecursiveSplitter,
}

impl<'a> Ingester<'a> {
    pub fn new(store: &'a SegmentStore, embedder: &'a dyn EmbedderBackend) -> Self {
        Self {
            store,
            embedder,
            splitter: RecursiveSplitter::default(),
        }
    }

    pub fn with_splitter(mut self, splitter: RecursiveSplitter) -> Self {
        self.splitter = splitter;
        self
    }

    /// Ingest the PDF at `path`, tagging every segment with `display_name`.
    pub fn ingest_file(&self, path: &Path, display_name: &str) -> Result<IngestSummary> {
        let pages = pdf::extract_pages(path)?;
        debug!("{}: {} pages extracted from {}", display_name, pages.len(), path.display());
        self.ingest_pages(&pages, display_name)
    }

    /// Split, embed and store already extracted pages.
    pub fn ingest_pages(&self, pages: &[PageText], display_name: &str) -> Result<IngestSummary> {
        let segments: Vec<Segment> = pages
            .iter()
            .flat_map(|page| {
                self.splitter
                    .split(&page.text)
                    .into_iter()
                    .map(move |chunk| Segment::new(chunk.text, display_name, page.page))
            })
            .collect();

        if segments.is_empty() {
            return Err(Error::Ingest(format!("no extractable text in {}", display_name)));
        }

        let texts: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();
        let embeddings = self.embedder.embed_batch(&texts)?;

        let entries = segments
            .into_iter()
            .zip(embeddings)
            .map(|(segment, result)| (segment, result.embedding))
            .collect();
        let segment_ids = self.store.add(entries)?;

        info!(
            "Ingested {} ({} pages, {} segments, embedder={})",
            display_name,
            pages.len(),
            segment_ids.len(),
            self.embedder.name()
        );

        Ok(IngestSummary {
            filename: display_name.to_string(),
            pages: pages.len(),
            segment_ids,
        })
    }
}
