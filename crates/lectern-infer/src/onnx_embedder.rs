//! ONNX-based embedding engine using all-MiniLM-L6-v2.
//!
//! Loads a SentenceTransformers ONNX model and tokenizer to generate
//! 384-dimensional float32 embeddings. Requires the `onnx` feature.

#[cfg(feature = "onnx")]
mod inner {
    use std::path::Path;

    use lectern_core::{Error, Result};
    use ndarray::Array1;
    use ort::session::Session;
    use ort::value::Tensor;
    use parking_lot::Mutex;
    use tokenizers::Tokenizer;
    use tracing::info;

    use crate::embedder::{l2_normalize, EmbedderBackend, EmbeddingResult};

    /// all-MiniLM-L6-v2 was trained with 256 word pieces; longer input is truncated.
    const MAX_SEQ_LEN: usize = 256;

    const DEFAULT_DIM: usize = 384;

    /// ONNX embedding engine using all-MiniLM-L6-v2.
    pub struct OnnxEmbedder {
        session: Mutex<Session>,
        tokenizer: Tokenizer,
        dimension: usize,
    }

    impl OnnxEmbedder {
        /// Load an ONNX model and tokenizer from the given directory.
        ///
        /// Expects:
        /// - `model_dir/model.onnx` — the ONNX model file
        /// - `model_dir/tokenizer.json` — the HuggingFace tokenizer
        pub fn load(model_dir: &Path) -> Result<Self> {
            let model_path = model_dir.join("model.onnx");
            let tokenizer_path = model_dir.join("tokenizer.json");

            if !model_path.exists() {
                return Err(Error::Config(format!("Model not found: {}", model_path.display())));
            }
            if !tokenizer_path.exists() {
                return Err(Error::Config(format!(
                    "Tokenizer not found: {}",
                    tokenizer_path.display()
                )));
            }

            // With load-dynamic, ORT_DYLIB_PATH must point to libonnxruntime.so
            ort::init().commit();

            let session = Session::builder()
                .map_err(|e| Error::Embedding(format!("Failed to create session builder: {}", e)))?
                .with_intra_threads(2)
                .map_err(|e| Error::Embedding(format!("Failed to set threads: {}", e)))?
                .commit_from_file(&model_path)
                .map_err(|e| Error::Embedding(format!("Failed to load ONNX model: {}", e)))?;

            let tokenizer = Tokenizer::from_file(&tokenizer_path)
                .map_err(|e| Error::Embedding(format!("Failed to load tokenizer: {}", e)))?;

            info!(
                "ONNX embedder loaded: dim={}, model={}",
                DEFAULT_DIM,
                model_path.display()
            );

            Ok(Self {
                session: Mutex::new(session),
                tokenizer,
                dimension: DEFAULT_DIM,
            })
        }

        fn infer(&self, text: &str) -> Result<Array1<f32>> {
            let encoding = self
                .tokenizer
                .encode(text, true)
                .map_err(|e| Error::Embedding(format!("Tokenization failed: {}", e)))?;

            let seq_len = encoding.get_ids().len().min(MAX_SEQ_LEN);
            let input_ids = &encoding.get_ids()[..seq_len];
            let attention_mask = &encoding.get_attention_mask()[..seq_len];

            let ids_data: Vec<i64> = input_ids.iter().map(|&id| id as i64).collect();
            let mask_data: Vec<i64> = attention_mask.iter().map(|&m| m as i64).collect();
            let type_ids_data: Vec<i64> = vec![0i64; seq_len];

            let tensor = |data: Vec<i64>, what: &str| {
                Tensor::from_array(([1usize, seq_len], data))
                    .map_err(|e| Error::Embedding(format!("Failed to create {} tensor: {}", what, e)))
            };
            let ids_tensor = tensor(ids_data, "ids")?;
            let mask_tensor = tensor(mask_data, "mask")?;
            let type_ids_tensor = tensor(type_ids_data, "type_ids")?;

            let mut session = self.session.lock();
            let outputs = session
                .run(ort::inputs![ids_tensor, mask_tensor, type_ids_tensor])
                .map_err(|e| Error::Embedding(format!("ONNX inference failed: {}", e)))?;

            // SentenceTransformers exports emit either token embeddings
            // [1, seq_len, dim] (mean pooling needed) or a pooled [1, dim].
            let (shape, data) = outputs[0]
                .try_extract_tensor::<f32>()
                .map_err(|e| Error::Embedding(format!("Failed to extract output tensor: {}", e)))?;

            let shape_dims: Vec<i64> = shape.iter().copied().collect();

            let mut embedding = match shape_dims.as_slice() {
                [_, _, dim] => {
                    let dim = *dim as usize;
                    let mask_sum: f32 = attention_mask.iter().map(|&m| m as f32).sum();
                    if mask_sum < 1e-9 {
                        return Err(Error::Embedding("empty attention mask".into()));
                    }

                    let mut pooled = Array1::<f32>::zeros(dim);
                    for (i, &m) in attention_mask.iter().enumerate() {
                        if m > 0 {
                            let offset = i * dim;
                            for d in 0..dim {
                                pooled[d] += data[offset + d];
                            }
                        }
                    }
                    pooled / mask_sum
                }
                [_, dim] => Array1::from_vec(data[..*dim as usize].to_vec()),
                other => {
                    return Err(Error::Embedding(format!("Unexpected output shape: {:?}", other)));
                }
            };

            l2_normalize(&mut embedding);
            Ok(embedding)
        }
    }

    impl EmbedderBackend for OnnxEmbedder {
        fn embed(&self, text: &str) -> Result<EmbeddingResult> {
            Ok(EmbeddingResult {
                embedding: self.infer(text)?,
                cached: false,
            })
        }

        fn dimension(&self) -> usize {
            self.dimension
        }

        fn name(&self) -> &'static str {
            "onnx-minilm"
        }
    }
}

#[cfg(feature = "onnx")]
pub use inner::OnnxEmbedder;
