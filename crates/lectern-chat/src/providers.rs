//! Hosted LLM providers constrained to structured JSON replies.
//!
//! Gemini gets the answer shape through `responseSchema`, OpenAI through a
//! strict `json_schema` response format. Both return the parsed JSON value;
//! shape validation happens in [`AnswerResult::from_model_output`].

use std::sync::Arc;

use futures::future::BoxFuture;
use lectern_core::{Error, Result};
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::LLMConfig;
use crate::types::{AnswerResult, LLMProvider};

/// A model that answers a prompt with a single JSON value.
pub trait StructuredModel: Send + Sync {
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<Value>>;
    fn model_name(&self) -> &str;
}

/// Build the configured model, if any provider has a key.
pub fn create_model(config: &LLMConfig, client: Client) -> Option<Arc<dyn StructuredModel>> {
    let (provider, model, api_key) = config.resolve_provider()?;
    let model: Arc<dyn StructuredModel> = match provider {
        LLMProvider::Gemini => Arc::new(GeminiModel::new(
            client,
            &config.gemini_base_url,
            model,
            api_key,
        )),
        LLMProvider::OpenAI => Arc::new(OpenAiModel::new(
            client,
            &config.openai_base_url,
            model,
            api_key,
        )),
    };
    Some(model)
}

pub struct GeminiModel {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiModel {
    pub fn new(client: Client, base_url: &str, model: String, api_key: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            api_key,
        }
    }
}

impl StructuredModel for GeminiModel {
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<Value>> {
        Box::pin(async move {
            let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
            let body = json!({
                "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
                "generationConfig": {
                    "responseMimeType": "application/json",
                    "responseSchema": AnswerResult::gemini_schema(),
                },
            });

            debug!("Requesting structured answer from {}", self.model);
            let payload = post_json(
                self.client
                    .post(&url)
                    .header("x-goog-api-key", &self.api_key)
                    .json(&body),
            )
            .await?;

            if let Some(reason) = payload["promptFeedback"]["blockReason"].as_str() {
                return Err(Error::Model(format!("prompt blocked: {}", reason)));
            }

            let candidate = &payload["candidates"][0];
            match candidate["content"]["parts"][0]["text"].as_str() {
                Some(text) => parse_reply(text),
                None => Err(Error::Model(format!(
                    "no content in reply (finishReason: {})",
                    candidate["finishReason"].as_str().unwrap_or("unknown")
                ))),
            }
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

pub struct OpenAiModel {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl OpenAiModel {
    pub fn new(client: Client, base_url: &str, model: String, api_key: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            api_key,
        }
    }
}

impl StructuredModel for OpenAiModel {
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<Value>> {
        Box::pin(async move {
            let url = format!("{}/chat/completions", self.base_url);
            let body = json!({
                "model": self.model,
                "messages": [{ "role": "user", "content": prompt }],
                "response_format": {
                    "type": "json_schema",
                    "json_schema": {
                        "name": "answer_result",
                        "strict": true,
                        "schema": AnswerResult::json_schema(),
                    },
                },
            });

            debug!("Requesting structured answer from {}", self.model);
            let payload = post_json(
                self.client
                    .post(&url)
                    .header("Authorization", format!("Bearer {}", self.api_key))
                    .json(&body),
            )
            .await?;

            let message = &payload["choices"][0]["message"];
            if let Some(refusal) = message["refusal"].as_str() {
                return Err(Error::Model(format!("model refused: {}", refusal)));
            }
            match message["content"].as_str() {
                Some(text) => parse_reply(text),
                None => Err(Error::Model("no content in reply".into())),
            }
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

async fn post_json(request: reqwest::RequestBuilder) -> Result<Value> {
    let response = request
        .send()
        .await
        .map_err(|e| Error::Http(format!("Request failed: {}", e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(Error::Model(format!("API error {}: {}", status, body)));
    }

    response
        .json()
        .await
        .map_err(|e| Error::Http(format!("Invalid response body: {}", e)))
}

fn parse_reply(text: &str) -> Result<Value> {
    serde_json::from_str(text.trim())
        .map_err(|e| Error::MalformedAnswer(format!("reply is not JSON: {}", e)))
}
