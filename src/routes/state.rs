use std::sync::Arc;

use crate::{
    db::{CatalogStore, InteractionStore},
    services::Recommender,
};

/// Bounds applied to the `limit` query parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendationLimits {
    /// Used when the caller names no limit
    pub default: usize,
    /// Larger requests are rejected
    pub max: usize,
}

impl Default for RecommendationLimits {
    fn default() -> Self {
        Self { default: 5, max: 50 }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogStore>,
    pub interactions: Arc<dyn InteractionStore>,
    pub recommender: Recommender,
    pub limits: RecommendationLimits,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        interactions: Arc<dyn InteractionStore>,
        recommender: Recommender,
        limits: RecommendationLimits,
    ) -> Self {
        Self {
            catalog,
            interactions,
            recommender,
            limits,
        }
    }
}
