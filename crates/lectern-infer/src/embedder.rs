//! Embedding engine trait.
//!
//! The `EmbedderBackend` trait abstracts over embedding generation.
//! Implementations:
//! - `OnnxEmbedder`: ONNX Runtime with all-MiniLM-L6-v2 (requires the `onnx` feature)
//! - `HashingEmbedder`: deterministic feature hashing, no model files needed
//!
//! Every backend returns unit-length vectors, so the squared L2 distance
//! between two embeddings is `2 - 2·cos` and stays within [0, 4].

use lectern_core::Result;
use ndarray::Array1;

/// Result of an embedding operation.
#[derive(Debug, Clone)]
pub struct EmbeddingResult {
    /// Float32 embedding vector (384-dim for all-MiniLM-L6-v2).
    pub embedding: Array1<f32>,
    /// Whether this was served from cache.
    pub cached: bool,
}

/// Trait for embedding backends.
pub trait EmbedderBackend: Send + Sync {
    /// Generate an embedding for a text string.
    fn embed(&self, text: &str) -> Result<EmbeddingResult>;

    /// Generate embeddings for a batch of texts. Fails on the first error.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<EmbeddingResult>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    /// Get the embedding dimension.
    fn dimension(&self) -> usize;

    /// Short backend name for logs.
    fn name(&self) -> &'static str;
}

/// Scale a vector to unit length in place. Near-zero vectors are left as is.
pub fn l2_normalize(v: &mut Array1<f32>) {
    let norm = v.dot(v).sqrt();
    if norm > 1e-9 {
        *v /= norm;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_l2_normalize() {
        let mut v = array![3.0f32, 4.0];
        l2_normalize(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);

        let mut zero = array![0.0f32, 0.0];
        l2_normalize(&mut zero);
        assert_eq!(zero, array![0.0, 0.0]);
    }
}
