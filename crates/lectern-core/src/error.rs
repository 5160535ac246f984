//! Error types for Lectern.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Ingest error: {0}")]
    Ingest(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Model error: {0}")]
    Model(String),

    /// The model replied, but not with the expected answer shape.
    #[error("Malformed answer: {0}")]
    MalformedAnswer(String),

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(String),
}

pub type Result<T> = std::result::Result<T, Error>;
