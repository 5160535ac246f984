//! Lectern Infer — embedding engine and query cache.
//!
//! Provides the `EmbedderBackend` trait for generating embeddings.
//! When the `onnx` feature is enabled and model files are present,
//! `OnnxEmbedder` loads all-MiniLM-L6-v2 for 384-dim embeddings.
//! Without it, `HashingEmbedder` produces deterministic 384-dim vectors
//! from word and character-trigram features.

pub mod cache;
pub mod embedder;
pub mod hashing;
pub mod onnx_embedder;

pub use cache::{CachedEmbedder, QueryCache};
pub use embedder::{l2_normalize, EmbedderBackend, EmbeddingResult};
pub use hashing::HashingEmbedder;

#[cfg(feature = "onnx")]
pub use onnx_embedder::OnnxEmbedder;

use std::path::Path;
use std::sync::Arc;

/// Create the best available embedder for the given model directory.
///
/// Tries ONNX first (if feature enabled and model files present),
/// falls back to `HashingEmbedder` with the requested dimension.
pub fn create_embedder(model_dir: &Path, dim: usize) -> Arc<dyn EmbedderBackend> {
    #[cfg(feature = "onnx")]
    {
        match OnnxEmbedder::load(model_dir) {
            Ok(embedder) if embedder.dimension() == dim => {
                tracing::info!("Using ONNX embedder (dim={})", embedder.dimension());
                return Arc::new(CachedEmbedder::new(embedder, QueryCache::default_cache()));
            }
            Ok(embedder) => {
                tracing::warn!(
                    "ONNX embedder has dim={}, expected {}. Falling back to feature hashing.",
                    embedder.dimension(),
                    dim
                );
            }
            Err(e) => {
                tracing::warn!("ONNX embedder unavailable: {}. Falling back to feature hashing.", e);
            }
        }
    }

    #[cfg(not(feature = "onnx"))]
    {
        let _ = model_dir;
        tracing::info!("ONNX feature disabled. Using feature-hashing embedder.");
    }

    Arc::new(HashingEmbedder::new(dim))
}
