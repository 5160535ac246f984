//! Lectern — ask questions about uploaded PDFs.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

mod error;
mod routes;
mod state;

use state::AppState;

fn resolve_data_dir() -> PathBuf {
    std::env::var("LECTERN_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let exe_dir = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()));
            if let Some(dir) = exe_dir {
                let parent_data = dir.join("../data");
                if parent_data.exists() {
                    return parent_data;
                }
            }
            PathBuf::from("data")
        })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let data_dir = resolve_data_dir();
    info!("Data directory: {}", data_dir.display());

    let config = lectern_core::QaConfig::from_env(&data_dir)?;
    let port = config.port;

    // Segments live in memory for the lifetime of the process
    let store = Arc::new(lectern_store::SegmentStore::new(config.embedding_dim));

    // ONNX if the model is present, feature hashing otherwise
    let embedder =
        lectern_infer::create_embedder(&config.data_paths.models, config.embedding_dim);

    let llm_config = lectern_chat::LLMConfig::load(&config.data_paths.llm_config_file);
    let model = lectern_chat::create_model(&llm_config, reqwest::Client::new());

    let state = Arc::new(AppState::new(config, store, embedder, model));
    let app = routes::build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Lectern server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
