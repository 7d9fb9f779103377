use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;

use crate::{
    models::{Interaction, InteractionType, Product, Recommendation, ScoredProduct},
    services::providers::ExplanationProvider,
};

/// Counts of a user's interactions by kind, used as context for explanations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionSummary {
    pub views: usize,
    pub carts: usize,
    pub purchases: usize,
    /// Interactions of a kind the service does not recognize
    pub other: usize,
}

impl InteractionSummary {
    pub fn from_interactions(interactions: &[Interaction]) -> Self {
        interactions
            .iter()
            .fold(Self::default(), |mut summary, interaction| {
                match interaction.interaction_type {
                    InteractionType::View => summary.views += 1,
                    InteractionType::Cart => summary.carts += 1,
                    InteractionType::Purchase => summary.purchases += 1,
                    InteractionType::Unrecognized(_) => summary.other += 1,
                }
                summary
            })
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn total(&self) -> usize {
        self.views + self.carts + self.purchases + self.other
    }
}

impl Display for InteractionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "New user with no previous interactions");
        }

        let mut parts = Vec::new();
        if self.views > 0 {
            parts.push(format!("Viewed {} products", self.views));
        }
        if self.purchases > 0 {
            parts.push(format!("Purchased {} items", self.purchases));
        }
        if self.carts > 0 {
            parts.push(format!("Added {} items to cart", self.carts));
        }

        if parts.is_empty() {
            write!(f, "Minimal activity")
        } else {
            write!(f, "{}", parts.join(", "))
        }
    }
}

/// Deterministic rationale used whenever a provider cannot produce one
pub fn fallback_explanation(product: &Product) -> String {
    format!(
        "Based on your interest in {} products, we think you'll love this {}. \
         It's highly rated and offers great value at ${}.",
        product.category, product.name, product.price
    )
}

/// Attaches an explanation to every ranked product
///
/// One task per item runs on a `JoinSet`, so dropping the returned future
/// aborts any generation still in flight. Failures, blank answers and
/// timeouts fall back to [`fallback_explanation`]. Output keeps the ranked
/// order no matter which explanation finishes first.
pub async fn explain_ranked(
    provider: Arc<dyn ExplanationProvider>,
    ranked: Vec<ScoredProduct>,
    summary: &InteractionSummary,
    timeout: Duration,
) -> Vec<Recommendation> {
    let mut tasks = JoinSet::new();

    for (index, scored) in ranked.iter().enumerate() {
        let provider = provider.clone();
        let product = scored.product.clone();
        let summary = summary.clone();
        tasks.spawn(async move {
            let outcome = tokio::time::timeout(timeout, provider.explain(&product, &summary)).await;
            (index, outcome)
        });
    }

    let mut explanations: Vec<Option<String>> = vec![None; ranked.len()];

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, Ok(Ok(text)))) => {
                let text = text.trim();
                if text.is_empty() {
                    tracing::warn!(
                        product_id = ranked[index].product.id,
                        provider = provider.name(),
                        "Provider returned a blank explanation"
                    );
                } else {
                    explanations[index] = Some(text.to_string());
                }
            }
            Ok((index, Ok(Err(e)))) => {
                tracing::warn!(
                    product_id = ranked[index].product.id,
                    provider = provider.name(),
                    error = %e,
                    "Explanation generation failed, using fallback"
                );
            }
            Ok((index, Err(_))) => {
                tracing::warn!(
                    product_id = ranked[index].product.id,
                    provider = provider.name(),
                    timeout_ms = timeout.as_millis() as u64,
                    "Explanation generation timed out, using fallback"
                );
            }
            Err(e) => {
                tracing::error!(error = %e, "Explanation task join error");
            }
        }
    }

    ranked
        .into_iter()
        .zip(explanations)
        .map(|(scored, explanation)| {
            let explanation = explanation.unwrap_or_else(|| fallback_explanation(&scored.product));
            Recommendation::new(scored, explanation)
        })
        .collect()
}
