use std::sync::Arc;

use reel_archive::{
    api::{create_router, AppState},
    config::Config,
    services::{EmbeddingProvider, FastEmbedProvider, MetadataProvider, OmdbProvider},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let metadata: Arc<dyn MetadataProvider> = Arc::new(OmdbProvider::new(
        config.omdb_api_key.clone(),
        config.omdb_api_url.clone(),
    ));

    // Model load is blocking and may download weights on first run
    let model_name = config.embedding_model.clone();
    let max_chars = config.embedding_max_chars;
    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(
        tokio::task::spawn_blocking(move || FastEmbedProvider::new(&model_name, max_chars))
            .await??,
    );

    tracing::info!(
        metadata_provider = metadata.name(),
        embedding_model = embedder.name(),
        recommendation_count = config.recommendation_count,
        "Providers ready"
    );

    let state = AppState::new(metadata, embedder)
        .with_recommendation_count(config.recommendation_count);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %listener.local_addr()?, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
