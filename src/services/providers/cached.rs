use std::sync::Arc;
use std::time::Duration;

use crate::{
    db::{Cache, CacheKey},
    error::AppResult,
    models::Product,
    services::{explanation::InteractionSummary, providers::ExplanationProvider},
};

/// Upper bound on a single cache lookup
pub const CACHE_READ_TIMEOUT: Duration = Duration::from_millis(250);

/// Read-through Redis cache in front of another provider
///
/// Only successful explanations are stored. A Redis read that fails or takes
/// longer than the read timeout is treated as a miss.
pub struct CachedProvider {
    inner: Arc<dyn ExplanationProvider>,
    cache: Cache,
    ttl: u64,
    read_timeout: Duration,
}

impl CachedProvider {
    pub fn new(inner: Arc<dyn ExplanationProvider>, cache: Cache, ttl: u64) -> Self {
        Self {
            inner,
            cache,
            ttl,
            read_timeout: CACHE_READ_TIMEOUT,
        }
    }

    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    fn cache_key(product: &Product, summary: &InteractionSummary) -> CacheKey {
        CacheKey::Explanation {
            product_id: product.id,
            activity: summary.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl ExplanationProvider for CachedProvider {
    async fn explain(&self, product: &Product, summary: &InteractionSummary) -> AppResult<String> {
        let key = Self::cache_key(product, summary);

        let lookup = tokio::time::timeout(
            self.read_timeout,
            self.cache.get_from_cache::<String>(&key),
        )
        .await;

        match lookup {
            Ok(Ok(Some(text))) => {
                tracing::debug!(product_id = product.id, "Explanation cache hit");
                return Ok(text);
            }
            Ok(Ok(None)) => {
                tracing::debug!(product_id = product.id, "Explanation cache miss");
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Explanation cache read failed");
            }
            Err(_) => {
                tracing::warn!(
                    product_id = product.id,
                    timeout_ms = self.read_timeout.as_millis() as u64,
                    "Explanation cache read timed out"
                );
            }
        }

        let text = self.inner.explain(product, summary).await?;
        self.cache.set_in_background(&key, &text, self.ttl);

        Ok(text)
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}
