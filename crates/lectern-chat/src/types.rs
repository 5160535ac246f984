//! Answer and context types.

use lectern_core::{Error, Result};
use lectern_store::ScoredSegment;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Hosted LLM provider identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LLMProvider {
    Gemini,
    OpenAI,
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::Gemini => write!(f, "gemini"),
            LLMProvider::OpenAI => write!(f, "openai"),
        }
    }
}

/// One retrieved segment as presented to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextEntry {
    pub text: String,
    /// 1-indexed.
    pub page_no: u32,
    pub filename: String,
}

impl From<&ScoredSegment> for ContextEntry {
    fn from(hit: &ScoredSegment) -> Self {
        Self {
            text: hit.segment.text.clone(),
            page_no: hit.segment.page_no(),
            filename: hit.segment.filename.clone(),
        }
    }
}

/// The only shape a model reply may take.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResult {
    pub answer: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub page_no: Option<i64>,
}

impl AnswerResult {
    /// Validate a model reply. Anything that is not an object with a string
    /// `answer` and correctly typed optional fields is `MalformedAnswer`.
    pub fn from_model_output(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(Error::MalformedAnswer(format!(
                "expected a JSON object, got {}",
                kind_of(&value)
            )));
        }
        serde_json::from_value(value).map_err(|e| Error::MalformedAnswer(e.to_string()))
    }

    /// JSON Schema for OpenAI strict structured outputs.
    pub fn json_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "answer": { "type": "string" },
                "filename": { "type": ["string", "null"] },
                "page_no": { "type": ["integer", "null"] },
            },
            "required": ["answer", "filename", "page_no"],
            "additionalProperties": false,
        })
    }

    /// OpenAPI-style schema accepted by Gemini's `responseSchema`.
    pub fn gemini_schema() -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "answer": { "type": "STRING" },
                "filename": { "type": "STRING", "nullable": true },
                "page_no": { "type": "INTEGER", "nullable": true },
            },
            "required": ["answer"],
        })
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
