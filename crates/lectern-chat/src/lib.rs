//! Retrieval-augmented question answering over stored segments.
//!
//! Questions are embedded, the nearest segments become JSON context for a
//! fixed prompt, and a hosted model (Gemini or OpenAI) is asked for a reply
//! constrained to the `AnswerResult` shape. The reply is validated locally.

pub mod config;
pub mod prompt;
pub mod providers;
pub mod rag;
pub mod types;

pub use config::LLMConfig;
pub use providers::{create_model, GeminiModel, OpenAiModel, StructuredModel};
pub use rag::Answerer;
pub use types::*;
