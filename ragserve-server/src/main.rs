//! Service entry point: load config, construct collaborators once, serve.

use std::sync::Arc;

use ragserve_core::{
    Embedder, Generator, HttpEmbedder, OllamaGenerator, PlainTextExtractor, QdrantIndex,
    RagConfig, VectorIndex,
};
use ragserve_server::routes;
use ragserve_server::state::AppState;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = RagConfig::from_env()?;
    info!(
        collection = %config.collection,
        qdrant = %config.qdrant_url,
        "starting ragserve"
    );

    info!(model = %config.embedding_model, url = %config.embedding_url, "probing embedding service");
    let embedder: Arc<dyn Embedder> = Arc::new(
        HttpEmbedder::connect(config.embedding_url.as_str(), config.embedding_model.as_str())
            .await?,
    );

    let generator: Arc<dyn Generator> = Arc::new(OllamaGenerator::new(
        config.generation_url.as_str(),
        config.generation_model.as_str(),
    ));

    let index: Arc<dyn VectorIndex> = Arc::new(QdrantIndex::new(&config.qdrant_url)?);
    index.ensure_collection(&config.collection, embedder.dimension()).await?;
    info!(collection = %config.collection, dimension = embedder.dimension(), "collection ready");

    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(
        config,
        Arc::new(PlainTextExtractor::new()),
        embedder,
        generator,
        index,
    ));

    let app = routes::router(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "serving");
    axum::serve(listener, app).await?;
    Ok(())
}
