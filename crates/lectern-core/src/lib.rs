//! Lectern Core — shared configuration and error types.

pub mod config;
pub mod error;

pub use config::{DataPaths, QaConfig, RecommendConfig};
pub use error::{Error, Result};
