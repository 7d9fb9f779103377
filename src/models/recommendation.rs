use serde::{Deserialize, Serialize};

use super::{Product, ScoredProduct};

/// A ranked product together with the rationale shown to the user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    #[serde(flatten)]
    pub product: Product,
    pub score: f64,
    pub explanation: String,
}

impl Recommendation {
    pub fn new(scored: ScoredProduct, explanation: String) -> Self {
        Self {
            product: scored.product,
            score: scored.score,
            explanation,
        }
    }
}

/// Query parameters accepted by the recommendations endpoint
#[derive(Debug, Default, Deserialize)]
pub struct RecommendationQuery {
    pub limit: Option<usize>,
}
