use std::collections::{HashMap, HashSet};

use crate::models::{Interaction, InteractionType, Product, ProductId, ScoredProduct};

/// Tunable weights of the scoring formula
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    /// Bonus for a candidate in a category the user already interacted with
    pub affinity: f64,
    /// Popularity is divided by this before being added to the score
    pub popularity_divisor: f64,
    pub purchase: f64,
    pub cart: f64,
    pub view: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            affinity: 2.0,
            popularity_divisor: 100.0,
            purchase: 0.5,
            cart: 0.3,
            view: 0.1,
        }
    }
}

impl ScoringWeights {
    /// Weight contributed by one historical interaction of the given kind
    pub fn interaction_weight(&self, kind: &InteractionType) -> f64 {
        match kind {
            InteractionType::Purchase => self.purchase,
            InteractionType::Cart => self.cart,
            InteractionType::View => self.view,
            InteractionType::Unrecognized(_) => 0.0,
        }
    }

    fn popularity_bonus(&self, product: &Product) -> f64 {
        product.popularity / self.popularity_divisor
    }
}

/// Ranks catalog products for a single user from their interaction history
///
/// The engine holds only its weights; catalog and interactions are passed
/// per call and never retained, so identical inputs always yield identical
/// output.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    weights: ScoringWeights,
}

impl ScoringEngine {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Returns up to `limit` products the user has not interacted with, best first
    ///
    /// Interactions belonging to other users are ignored. Without any history
    /// the most popular products are returned. Equal scores keep catalog order.
    pub fn recommend(
        &self,
        user_id: &str,
        catalog: &[Product],
        interactions: &[Interaction],
        limit: usize,
    ) -> Vec<ScoredProduct> {
        let history: Vec<&Interaction> = interactions
            .iter()
            .filter(|i| i.user_id == user_id)
            .collect();

        let mut ranked = if history.is_empty() {
            self.cold_start(catalog)
        } else {
            self.score_candidates(catalog, &history)
        };

        // sort_by is stable, so ties stay in catalog order
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked.truncate(limit);

        tracing::debug!(
            user_id = %user_id,
            history = history.len(),
            catalog = catalog.len(),
            returned = ranked.len(),
            "Scored recommendation candidates"
        );

        ranked
    }

    /// Popularity-only ranking for users without history
    fn cold_start(&self, catalog: &[Product]) -> Vec<ScoredProduct> {
        catalog
            .iter()
            .map(|product| ScoredProduct {
                product: product.clone(),
                score: self.weights.popularity_bonus(product),
            })
            .collect()
    }

    fn score_candidates(&self, catalog: &[Product], history: &[&Interaction]) -> Vec<ScoredProduct> {
        let by_id: HashMap<ProductId, &Product> = catalog.iter().map(|p| (p.id, p)).collect();

        let seen: HashSet<ProductId> = history.iter().map(|i| i.product_id).collect();

        // Interactions whose product left the catalog contribute nothing
        let mut category_weights: HashMap<&str, Vec<f64>> = HashMap::new();
        for interaction in history {
            if let Some(product) = by_id.get(&interaction.product_id) {
                category_weights
                    .entry(product.category.as_str())
                    .or_default()
                    .push(self.weights.interaction_weight(&interaction.interaction_type));
            }
        }

        catalog
            .iter()
            .filter(|product| !seen.contains(&product.id))
            .map(|product| {
                let mut score = 0.0;

                let matched = category_weights.get(product.category.as_str());
                if matched.is_some() {
                    score += self.weights.affinity;
                }

                score += self.weights.popularity_bonus(product);

                for weight in matched.into_iter().flatten() {
                    score += weight;
                }

                ScoredProduct {
                    product: product.clone(),
                    score,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const USER: &str = "user1";

    fn product(id: ProductId, category: &str, popularity: f64) -> Product {
        Product {
            id,
            name: format!("Product {}", id),
            category: category.to_string(),
            price: 10.0 * id as f64,
            description: String::new(),
            popularity,
        }
    }

    fn interaction(product_id: ProductId, kind: &str) -> Interaction {
        Interaction {
            id: product_id,
            user_id: USER.to_string(),
            product_id,
            interaction_type: InteractionType::from(kind),
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
        }
    }

    fn ids(ranked: &[ScoredProduct]) -> Vec<ProductId> {
        ranked.iter().map(|s| s.product.id).collect()
    }

    fn score_of(ranked: &[ScoredProduct], id: ProductId) -> f64 {
        ranked
            .iter()
            .find(|s| s.product.id == id)
            .map(|s| s.score)
            .unwrap()
    }

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_end_to_end_example() {
        let engine = ScoringEngine::default();
        let catalog = vec![
            product(1, "Audio", 80.0),
            product(2, "Audio", 10.0),
            product(3, "Gaming", 50.0),
        ];
        let history = vec![interaction(1, "purchase")];

        let ranked = engine.recommend(USER, &catalog, &history, 5);

        assert_eq!(ids(&ranked), vec![2, 3]);
        assert!(approx_eq(ranked[0].score, 2.6));
        assert!(approx_eq(ranked[1].score, 0.5));
    }

    #[test]
    fn test_empty_catalog_yields_empty() {
        let engine = ScoringEngine::default();
        assert!(engine.recommend(USER, &[], &[], 5).is_empty());
        assert!(engine
            .recommend(USER, &[], &[interaction(1, "view")], 5)
            .is_empty());
    }

    #[test]
    fn test_cold_start_orders_by_popularity() {
        let engine = ScoringEngine::default();
        let catalog = vec![
            product(1, "Audio", 10.0),
            product(2, "Gaming", 90.0),
            product(3, "Books", 40.0),
            product(4, "Audio", 70.0),
        ];

        let ranked = engine.recommend(USER, &catalog, &[], 3);
        assert_eq!(ids(&ranked), vec![2, 4, 3]);
        assert!(approx_eq(ranked[0].score, 0.9));
    }

    #[test]
    fn test_cold_start_ties_keep_catalog_order() {
        let engine = ScoringEngine::default();
        let catalog = vec![
            product(5, "Audio", 30.0),
            product(1, "Gaming", 30.0),
            product(9, "Books", 30.0),
            product(2, "Books", 60.0),
        ];

        let ranked = engine.recommend(USER, &catalog, &[], 10);
        assert_eq!(ids(&ranked), vec![2, 5, 1, 9]);
    }

    #[test]
    fn test_other_users_history_is_cold_start() {
        let engine = ScoringEngine::default();
        let catalog = vec![product(1, "Audio", 10.0), product(2, "Gaming", 90.0)];
        let mut foreign = interaction(2, "purchase");
        foreign.user_id = "someone-else".to_string();

        let ranked = engine.recommend(USER, &catalog, &[foreign], 5);
        assert_eq!(ids(&ranked), vec![2, 1]);
    }

    #[test]
    fn test_seen_products_never_recommended() {
        let engine = ScoringEngine::default();
        let catalog = vec![
            product(1, "Audio", 99.0),
            product(2, "Audio", 98.0),
            product(3, "Gaming", 1.0),
            product(4, "Books", 0.0),
        ];
        let history = vec![
            interaction(1, "view"),
            interaction(2, "cart"),
            interaction(4, "wishlist"),
        ];

        let ranked = engine.recommend(USER, &catalog, &history, 10);
        assert_eq!(ids(&ranked), vec![3]);
    }

    #[test]
    fn test_deterministic() {
        let engine = ScoringEngine::default();
        let catalog = vec![
            product(1, "Audio", 20.0),
            product(2, "Audio", 20.0),
            product(3, "Gaming", 20.0),
            product(4, "Gaming", 35.0),
            product(5, "Books", 5.0),
        ];
        let history = vec![interaction(5, "view"), interaction(3, "cart")];

        let first = engine.recommend(USER, &catalog, &history, 5);
        let second = engine.recommend(USER, &catalog, &history, 5);
        assert_eq!(first, second);
    }

    #[test]
    fn test_popularity_increase_never_lowers_rank() {
        let engine = ScoringEngine::default();
        let history = vec![interaction(10, "view")];
        let mut catalog = vec![
            product(10, "Audio", 0.0),
            product(1, "Audio", 40.0),
            product(2, "Audio", 45.0),
            product(3, "Gaming", 50.0),
        ];

        let before = engine.recommend(USER, &catalog, &history, 10);
        catalog[1].popularity = 60.0;
        let after = engine.recommend(USER, &catalog, &history, 10);

        assert!(score_of(&after, 1) > score_of(&before, 1));
        let rank = |ranked: &[ScoredProduct]| ids(ranked).iter().position(|&id| id == 1).unwrap();
        assert!(rank(&after) <= rank(&before));
        assert_eq!(ids(&after)[0], 1);
    }

    #[test]
    fn test_category_affinity_beats_untouched_category() {
        let engine = ScoringEngine::default();
        let catalog = vec![
            product(1, "Audio", 0.0),
            product(2, "Gaming", 25.0),
            product(3, "Audio", 25.0),
        ];
        let history = vec![interaction(1, "view")];

        let ranked = engine.recommend(USER, &catalog, &history, 5);
        assert!(score_of(&ranked, 3) > score_of(&ranked, 2));
        assert!(approx_eq(score_of(&ranked, 3), 2.0 + 0.25 + 0.1));
        assert!(approx_eq(score_of(&ranked, 2), 0.25));
    }

    #[test]
    fn test_interaction_weight_ordering() {
        let engine = ScoringEngine::default();
        let catalog = vec![
            product(1, "Audio", 0.0),
            product(2, "Gaming", 0.0),
            product(3, "Books", 0.0),
            product(11, "Audio", 10.0),
            product(12, "Gaming", 10.0),
            product(13, "Books", 10.0),
        ];
        let history = vec![
            interaction(1, "purchase"),
            interaction(2, "cart"),
            interaction(3, "view"),
        ];

        let ranked = engine.recommend(USER, &catalog, &history, 5);
        assert_eq!(ids(&ranked), vec![11, 12, 13]);
        assert!(score_of(&ranked, 11) > score_of(&ranked, 12));
        assert!(score_of(&ranked, 12) > score_of(&ranked, 13));
    }

    #[test]
    fn test_repeated_interactions_compound() {
        let engine = ScoringEngine::default();
        let catalog = vec![
            product(1, "Audio", 0.0),
            product(2, "Audio", 0.0),
            product(3, "Audio", 0.0),
        ];
        let history = vec![
            interaction(1, "view"),
            interaction(1, "view"),
            interaction(2, "purchase"),
        ];

        let ranked = engine.recommend(USER, &catalog, &history, 5);
        assert_eq!(ids(&ranked), vec![3]);
        assert!(approx_eq(ranked[0].score, 2.0 + 0.1 + 0.1 + 0.5));
    }

    #[test]
    fn test_unrecognized_type_contributes_only_affinity() {
        let engine = ScoringEngine::default();
        let catalog = vec![product(1, "Audio", 0.0), product(2, "Audio", 0.0)];
        let history = vec![interaction(1, "wishlist")];

        let ranked = engine.recommend(USER, &catalog, &history, 5);
        assert_eq!(ids(&ranked), vec![2]);
        assert!(approx_eq(ranked[0].score, 2.0));
    }

    #[test]
    fn test_missing_catalog_product_is_tolerated() {
        let engine = ScoringEngine::default();
        let catalog = vec![product(1, "Audio", 30.0), product(2, "Gaming", 20.0)];
        let history = vec![interaction(99, "purchase")];

        let ranked = engine.recommend(USER, &catalog, &history, 5);
        assert_eq!(ids(&ranked), vec![1, 2]);
        assert!(approx_eq(ranked[0].score, 0.3));
        assert!(approx_eq(ranked[1].score, 0.2));
    }

    #[test]
    fn test_warm_ties_keep_catalog_order() {
        let engine = ScoringEngine::default();
        let catalog = vec![
            product(7, "Gaming", 10.0),
            product(3, "Gaming", 10.0),
            product(1, "Audio", 0.0),
            product(5, "Gaming", 10.0),
        ];
        let history = vec![interaction(1, "view")];

        let ranked = engine.recommend(USER, &catalog, &history, 5);
        assert_eq!(ids(&ranked), vec![7, 3, 5]);
    }

    #[test]
    fn test_truncation() {
        let engine = ScoringEngine::default();
        let catalog: Vec<Product> = (1..=8).map(|id| product(id, "Audio", id as f64)).collect();
        let history = vec![interaction(1, "view")];

        for k in 0..10 {
            assert!(engine.recommend(USER, &catalog, &[], k).len() <= k);
            assert!(engine.recommend(USER, &catalog, &history, k).len() <= k);
        }
        assert!(engine.recommend(USER, &catalog, &history, 0).is_empty());
        assert_eq!(engine.recommend(USER, &catalog, &history, 3).len(), 3);
    }

    #[test]
    fn test_custom_weights() {
        let engine = ScoringEngine::new(ScoringWeights {
            affinity: 0.0,
            popularity_divisor: 10.0,
            purchase: 0.0,
            cart: 0.0,
            view: 5.0,
        });
        let catalog = vec![
            product(1, "Audio", 0.0),
            product(2, "Audio", 10.0),
            product(3, "Gaming", 20.0),
        ];
        let history = vec![interaction(1, "view")];

        let ranked = engine.recommend(USER, &catalog, &history, 5);
        assert_eq!(ids(&ranked), vec![2, 3]);
        assert!(approx_eq(ranked[0].score, 6.0));
        assert!(approx_eq(ranked[1].score, 2.0));
    }
}
