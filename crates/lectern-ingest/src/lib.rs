//! Lectern Ingest — PDF page extraction, segment splitting, document ingestion.

pub mod chunking;
pub mod ingest;
pub mod pdf;

pub use chunking::{RecursiveSplitter, TextChunk, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
pub use ingest::{IngestSummary, Ingester};
pub use pdf::{extract_pages, PageText};
