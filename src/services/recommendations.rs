use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::{
    db::{CatalogStore, InteractionStore},
    error::{AppError, AppResult},
    models::Recommendation,
    services::{
        explanation::{explain_ranked, InteractionSummary},
        providers::ExplanationProvider,
        scoring::ScoringEngine,
    },
};

/// Produces explained recommendations for a user
///
/// Each call loads a fresh catalog and interaction snapshot, ranks it with
/// the scoring engine and only then asks the explanation provider for
/// rationale text.
#[derive(Clone)]
pub struct Recommender {
    catalog: Arc<dyn CatalogStore>,
    interactions: Arc<dyn InteractionStore>,
    engine: ScoringEngine,
    explainer: Arc<dyn ExplanationProvider>,
    explanation_timeout: Duration,
}

impl Recommender {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        interactions: Arc<dyn InteractionStore>,
        engine: ScoringEngine,
        explainer: Arc<dyn ExplanationProvider>,
        explanation_timeout: Duration,
    ) -> Self {
        Self {
            catalog,
            interactions,
            engine,
            explainer,
            explanation_timeout,
        }
    }

    /// Ranks up to `limit` products for `user_id` and attaches explanations
    ///
    /// Fails as a whole with a retrieval error if either store fails.
    pub async fn recommend(&self, user_id: &str, limit: usize) -> AppResult<Vec<Recommendation>> {
        let start = Instant::now();

        let (catalog, history) = tokio::try_join!(
            async {
                self.catalog
                    .list_products()
                    .await
                    .map_err(|e| AppError::retrieval("catalog", e))
            },
            async {
                self.interactions
                    .interactions_for_user(user_id)
                    .await
                    .map_err(|e| AppError::retrieval("interactions", e))
            },
        )?;

        let ranked = self.engine.recommend(user_id, &catalog, &history, limit);
        let summary = InteractionSummary::from_interactions(&history);

        tracing::info!(
            user_id = %user_id,
            catalog = catalog.len(),
            history = history.len(),
            returned = ranked.len(),
            cold_start = history.is_empty(),
            "Ranked recommendations"
        );

        let recommendations = explain_ranked(
            self.explainer.clone(),
            ranked,
            &summary,
            self.explanation_timeout,
        )
        .await;

        tracing::info!(
            user_id = %user_id,
            provider = self.explainer.name(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Recommendations explained"
        );

        Ok(recommendations)
    }
}
