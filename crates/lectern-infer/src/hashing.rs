//! Feature-hashing embedder.
//!
//! Maps lowercase word tokens and character trigrams into a fixed number of
//! buckets with a signed SHA-256 hash, then L2-normalises. Texts sharing
//! vocabulary land close together, which is enough for retrieval when the
//! ONNX model is not installed.

use lectern_core::{Error, Result};
use ndarray::Array1;
use regex::Regex;
use sha2::{Digest, Sha256};

use crate::embedder::{l2_normalize, EmbedderBackend, EmbeddingResult};

/// Trigram features count for less than whole words.
const TRIGRAM_WEIGHT: f32 = 0.5;

/// Deterministic embedder based on the hashing trick.
pub struct HashingEmbedder {
    dim: usize,
    token_re: Regex,
}

impl HashingEmbedder {
    pub fn new(dim: usize) -> Self {
        Self {
            dim: dim.max(1),
            token_re: Regex::new(r"[\p{L}\p{N}]+").expect("static regex"),
        }
    }

    fn accumulate(&self, v: &mut Array1<f32>, feature: &str, weight: f32) {
        let digest = Sha256::digest(feature.as_bytes());
        let mut bucket_bytes = [0u8; 8];
        bucket_bytes.copy_from_slice(&digest[..8]);
        let bucket = (u64::from_le_bytes(bucket_bytes) % self.dim as u64) as usize;
        let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
        v[bucket] += sign * weight;
    }
}

impl EmbedderBackend for HashingEmbedder {
    fn embed(&self, text: &str) -> Result<EmbeddingResult> {
        let mut v = Array1::<f32>::zeros(self.dim);
        let lowered = text.to_lowercase();

        for token in self.token_re.find_iter(&lowered) {
            let word = token.as_str();
            self.accumulate(&mut v, word, 1.0);

            let padded: Vec<char> = format!("#{}#", word).chars().collect();
            for tri in padded.windows(3) {
                let tri: String = tri.iter().collect();
                self.accumulate(&mut v, &tri, TRIGRAM_WEIGHT);
            }
        }

        if v.iter().any(|x| !x.is_finite()) {
            return Err(Error::Embedding("non-finite feature weight".into()));
        }
        l2_normalize(&mut v);

        Ok(EmbeddingResult {
            embedding: v,
            cached: false,
        })
    }

    fn dimension(&self) -> usize {
        self.dim
    }

    fn name(&self) -> &'static str {
        "hashing"
    }
}
