//! Configuration and data directory management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::warn;

/// Paths to the files Lectern reads at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root data directory (e.g., `data/`).
    pub root: PathBuf,
    /// Embedding model directory (`data/models/`), holds `model.onnx` + `tokenizer.json`.
    pub models: PathBuf,
    /// LLM configuration (`data/llm-config.json`).
    pub llm_config_file: PathBuf,
    /// Movie table snapshot (`data/movies.json`).
    pub movies_file: PathBuf,
    /// Prebuilt neighbour index snapshot (`data/neighbors.json`).
    pub neighbors_file: PathBuf,
}

impl DataPaths {
    /// Create data paths from a root directory. Creates the root if needed.
    pub fn new(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        Ok(Self {
            models: root.join("models"),
            llm_config_file: root.join("llm-config.json"),
            movies_file: root.join("movies.json"),
            neighbors_file: root.join("neighbors.json"),
            root,
        })
    }
}

/// Configuration for the document QA server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaConfig {
    /// HTTP server port.
    pub port: u16,
    pub data_paths: DataPaths,
    /// Embedding dimension (384 for all-MiniLM-L6-v2).
    pub embedding_dim: usize,
    /// Target segment length in characters.
    pub chunk_size: usize,
    /// Maximum characters shared by consecutive segments.
    pub chunk_overlap: usize,
    /// Number of segments retrieved per question.
    pub top_k: usize,
    /// Request body limit for uploads.
    pub max_upload_bytes: usize,
}

impl QaConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env(data_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let data_paths = DataPaths::new(data_dir)?;
        let max_upload_mb: usize = env_or("LECTERN_MAX_UPLOAD_MB", 50);

        Ok(Self {
            port: env_or("PORT", 8000),
            data_paths,
            embedding_dim: 384,
            chunk_size: env_or("LECTERN_CHUNK_SIZE", 1000),
            chunk_overlap: env_or("LECTERN_CHUNK_OVERLAP", 200),
            top_k: env_or("LECTERN_TOP_K", 5),
            max_upload_bytes: max_upload_mb * 1024 * 1024,
        })
    }
}

/// Configuration for the movie recommendation UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendConfig {
    pub port: u16,
    pub data_paths: DataPaths,
    /// How many recommendations are computed for the selected movie.
    pub recommendations: usize,
    /// Weight of the normalised rating in the rerank boost.
    pub rating_weight: f64,
    /// Cards per page in the recommendation grid.
    pub page_size: usize,
}

impl RecommendConfig {
    pub fn from_env(data_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        Ok(Self {
            port: env_or("PORT", 8501),
            data_paths: DataPaths::new(data_dir)?,
            recommendations: env_or("LECTERN_RECOMMENDATIONS", 10),
            rating_weight: env_or("LECTERN_RATING_WEIGHT", 0.2),
            page_size: env_or("LECTERN_PAGE_SIZE", 6).max(1),
        })
    }
}

/// Read and parse an environment variable, falling back to `default` when it is
/// unset or unparsable.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(v) => v.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring unparsable {}={:?}", key, v);
            default
        }),
        Err(_) => default,
    }
}
