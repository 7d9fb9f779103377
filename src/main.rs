use std::sync::Arc;

use recommender_api::{
    config::Config,
    db::{create_pool, create_redis_client, Cache, CacheWriterHandle, PgStore},
    routes::{create_router, AppState, RecommendationLimits},
    services::{
        providers::{CachedProvider, ExplanationProvider, GeminiProvider, TemplateProvider},
        Recommender, ScoringEngine,
    },
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("recommender_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    let store = Arc::new(PgStore::new(pool));
    store.migrate().await?;
    tracing::info!("Database ready");

    let (explainer, cache_handle) = build_explainer(&config).await?;
    tracing::info!(provider = explainer.name(), "Explanation provider configured");

    let recommender = Recommender::new(
        store.clone(),
        store.clone(),
        ScoringEngine::new(config.scoring_weights()),
        explainer,
        config.explanation_timeout(),
    );

    let state = AppState::new(
        store.clone(),
        store,
        recommender,
        RecommendationLimits {
            default: config.default_recommendation_limit,
            max: config.max_recommendation_limit,
        },
    );

    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_handle {
        handle.shutdown().await;
    }

    Ok(())
}

/// Picks the explanation provider from configuration, optionally behind Redis
async fn build_explainer(
    config: &Config,
) -> anyhow::Result<(Arc<dyn ExplanationProvider>, Option<CacheWriterHandle>)> {
    let base: Arc<dyn ExplanationProvider> = match &config.gemini_api_key {
        Some(api_key) if !api_key.trim().is_empty() => Arc::new(GeminiProvider::new(
            api_key.clone(),
            config.gemini_api_url.clone(),
            config.gemini_model.clone(),
        )),
        _ => {
            tracing::warn!("GEMINI_API_KEY not set, using templated explanations");
            Arc::new(TemplateProvider)
        }
    };

    match &config.redis_url {
        Some(redis_url) => {
            let client = create_redis_client(redis_url)?;
            let (cache, handle) = Cache::new(client).await;
            let cached = CachedProvider::new(base, cache, config.explanation_cache_ttl_secs);
            Ok((Arc::new(cached), Some(handle)))
        }
        None => Ok((base, None)),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
