//! Lectern Movies — browse rating-boosted recommendations.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

mod error;
mod html;
mod routes;
mod state;

use state::AppState;

fn resolve_data_dir() -> PathBuf {
    std::env::var("LECTERN_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"))
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

    let config = lectern_core::RecommendConfig::from_env(&data_dir)?;
    let port = config.port;

    // A broken table or index snapshot is fatal
    let state = Arc::new(
        AppState::load(config)
            .map_err(|e| anyhow::anyhow!("Failed to load movie data: {}", e))?,
    );
    let app = routes::build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Lectern movies listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
