//! HTTP route handlers.

pub mod ask;
pub mod documents;
pub mod root;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the main Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_upload_bytes;

    // Credentials rule out wildcards, so origin, methods and headers are mirrored
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    Router::new()
        .merge(root::routes())
        .merge(documents::routes())
        .merge(ask::routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use futures::future::BoxFuture;
    use lectern_chat::StructuredModel;
    use lectern_core::QaConfig;
    use lectern_infer::HashingEmbedder;
    use lectern_store::SegmentStore;
    use parking_lot::Mutex;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const BOUNDARY: &str = "lectern-test-boundary";

    struct ScriptedModel {
        reply: Value,
        prompts: Mutex<Vec<String>>,
    }

    impl StructuredModel for ScriptedModel {
        fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, lectern_core::Result<Value>> {
            self.prompts.lock().push(prompt.to_string());
            let reply = self.reply.clone();
            Box::pin(async move { Ok(reply) })
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    struct Harness {
        state: Arc<AppState>,
        _dir: tempfile::TempDir,
    }

    fn harness(model: Option<Arc<dyn StructuredModel>>) -> Harness {
        let dir = tempfile::TempDir::new().unwrap();
        let config = QaConfig::from_env(dir.path()).unwrap();
        let store = Arc::new(SegmentStore::new(config.embedding_dim));
        let embedder = Arc::new(HashingEmbedder::new(config.embedding_dim));
        let state = Arc::new(AppState::new(config, store, embedder, model));
        Harness { state, _dir: dir }
    }

    fn scripted(reply: Value) -> Arc<ScriptedModel> {
        Arc::new(ScriptedModel {
            reply,
            prompts: Mutex::new(Vec::new()),
        })
    }

    /// A one-page PDF whose page shows `text`.
    fn pdf_with_text(text: &str) -> Vec<u8> {
        use lopdf::content::{Content, Operation};
        use lopdf::{dictionary, Document, Object, Stream};

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    fn multipart_request(field: &str, filename: &str, bytes: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: application/pdf\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/uploadfile")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(state: &Arc<AppState>, request: Request<Body>) -> (StatusCode, Value) {
        let response = build_router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_root_greets() {
        let h = harness(None);
        let (status, body) = send(&h.state, get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Hello World"}));
    }

    #[tokio::test]
    async fn test_upload_then_ask() {
        let model = scripted(json!({
            "answer": "Chlorophyll absorbs light.",
            "filename": "plants.pdf",
            "page_no": 1,
        }));
        let h = harness(Some(model.clone()));

        let pdf = pdf_with_text("Chlorophyll absorbs light for photosynthesis.");
        let (status, body) = send(&h.state, multipart_request("file", "plants.pdf", &pdf)).await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        assert_eq!(body, json!({"message": "Files uploaded successfully"}));
        assert_eq!(h.state.store.len(), 1);

        let (status, body) = send(&h.state, get("/ask?question=What%20absorbs%20light%3F")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["answer"], "Chlorophyll absorbs light.");
        assert_eq!(body["filename"], "plants.pdf");
        assert_eq!(body["page_no"], 1);

        let prompt = model.prompts.lock().last().cloned().unwrap();
        assert!(prompt.contains("What absorbs light?"));
        assert!(prompt.contains("\"filename\": \"plants.pdf\""));
        assert!(prompt.contains("\"page_no\": 1"));
    }

    #[tokio::test]
    async fn test_upload_rejects_non_pdf() {
        let h = harness(None);
        let (status, body) =
            send(&h.state, multipart_request("file", "notes.pdf", b"plain text")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("Extraction"));
        assert!(h.state.store.is_empty());
    }

    #[tokio::test]
    async fn test_upload_requires_file_field() {
        let h = harness(None);
        let pdf = pdf_with_text("ignored");
        let (status, body) = send(&h.state, multipart_request("document", "a.pdf", &pdf)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn test_upload_requires_multipart() {
        let h = harness(None);
        let request = Request::builder()
            .method("POST")
            .uri("/uploadfile")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let (status, body) = send(&h.state, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn test_ask_without_question() {
        let h = harness(Some(scripted(json!({"answer": "x"}))));
        let (status, body) = send(&h.state, get("/ask")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn test_ask_without_provider() {
        let h = harness(None);
        let (status, body) = send(&h.state, get("/ask?question=hello")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("Configuration"));
    }

    #[tokio::test]
    async fn test_ask_with_empty_store() {
        let model = scripted(json!({"answer": "Not in the documents.", "filename": null, "page_no": null}));
        let h = harness(Some(model.clone()));

        let (status, body) = send(&h.state, get("/ask?question=anything")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["filename"].is_null());
        assert!(body["page_no"].is_null());
    }

    #[tokio::test]
    async fn test_malformed_model_reply() {
        let h = harness(Some(scripted(json!(["not", "an", "object"]))));
        let (status, body) = send(&h.state, get("/ask?question=anything")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("Malformed answer"));
    }

    #[tokio::test]
    async fn test_cors_mirrors_origin_with_credentials() {
        let h = harness(None);
        let request = Request::builder()
            .uri("/")
            .header(header::ORIGIN, "http://localhost:3000")
            .body(Body::empty())
            .unwrap();
        let response = build_router(h.state.clone()).oneshot(request).await.unwrap();

        let headers = response.headers();
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:3000"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    }
}
