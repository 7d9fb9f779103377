//! Storage collaborators consumed by the recommendation flow
//!
//! The scoring engine never talks to storage itself: handlers load a
//! snapshot through these traits and pass it in.

use crate::{
    error::AppResult,
    models::{Interaction, NewInteraction, Product, ProductId},
};

/// Read access to the product catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    /// Every product in the catalog, in a stable order
    async fn list_products(&self) -> AppResult<Vec<Product>>;

    async fn get_product(&self, id: ProductId) -> AppResult<Option<Product>>;
}

/// Append-only log of user interactions
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait InteractionStore: Send + Sync {
    /// A user's interactions, oldest first
    async fn interactions_for_user(&self, user_id: &str) -> AppResult<Vec<Interaction>>;

    /// Stores an interaction stamped with the current server time
    async fn record_interaction(&self, interaction: NewInteraction) -> AppResult<Interaction>;

    /// Removes all of a user's interactions and returns how many were deleted
    async fn delete_interactions_for_user(&self, user_id: &str) -> AppResult<u64>;
}
