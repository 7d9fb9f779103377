use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    db::{CatalogStore, InteractionStore},
    error::AppResult,
    models::{Interaction, NewInteraction, Product, ProductId},
};

/// In-process catalog and interaction store
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<MemoryStoreInner>>,
}

#[derive(Default)]
struct MemoryStoreInner {
    products: Vec<Product>,
    interactions: Vec<Interaction>,
    next_interaction_id: i64,
}

impl MemoryStore {
    /// Creates a store holding the given catalog and no interactions
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryStoreInner {
                products,
                interactions: Vec::new(),
                next_interaction_id: 1,
            })),
        }
    }

    /// Drops a product from the catalog, leaving interactions that reference it
    pub async fn remove_product(&self, id: ProductId) {
        let mut inner = self.inner.write().await;
        inner.products.retain(|p| p.id != id);
    }
}

#[async_trait::async_trait]
impl CatalogStore for MemoryStore {
    async fn list_products(&self) -> AppResult<Vec<Product>> {
        let inner = self.inner.read().await;
        Ok(inner.products.clone())
    }

    async fn get_product(&self, id: ProductId) -> AppResult<Option<Product>> {
        let inner = self.inner.read().await;
        Ok(inner.products.iter().find(|p| p.id == id).cloned())
    }
}

#[async_trait::async_trait]
impl InteractionStore for MemoryStore {
    async fn interactions_for_user(&self, user_id: &str) -> AppResult<Vec<Interaction>> {
        let inner = self.inner.read().await;
        Ok(inner
            .interactions
            .iter()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn record_interaction(&self, interaction: NewInteraction) -> AppResult<Interaction> {
        let mut inner = self.inner.write().await;
        inner.next_interaction_id = inner.next_interaction_id.max(1);

        let recorded = Interaction {
            id: inner.next_interaction_id,
            user_id: interaction.user_id,
            product_id: interaction.product_id,
            interaction_type: interaction.interaction_type,
            timestamp: Utc::now(),
        };
        inner.next_interaction_id += 1;
        inner.interactions.push(recorded.clone());

        Ok(recorded)
    }

    async fn delete_interactions_for_user(&self, user_id: &str) -> AppResult<u64> {
        let mut inner = self.inner.write().await;
        let before = inner.interactions.len();
        inner.interactions.retain(|i| i.user_id != user_id);
        Ok((before - inner.interactions.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InteractionType;

    fn product(id: ProductId) -> Product {
        Product {
            id,
            name: format!("Product {}", id),
            category: "Audio".to_string(),
            price: 10.0,
            description: String::new(),
            popularity: 0.0,
        }
    }

    fn new_interaction(user_id: &str, product_id: ProductId) -> NewInteraction {
        NewInteraction {
            user_id: user_id.to_string(),
            product_id,
            interaction_type: InteractionType::View,
        }
    }

    #[tokio::test]
    async fn test_record_assigns_increasing_ids() {
        let store = MemoryStore::default();
        let first = store.record_interaction(new_interaction("u1", 1)).await.unwrap();
        let second = store.record_interaction(new_interaction("u1", 2)).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert!(second.timestamp >= first.timestamp);
    }

    #[tokio::test]
    async fn test_interactions_are_scoped_to_user() {
        let store = MemoryStore::new(vec![product(1)]);
        store.record_interaction(new_interaction("u1", 1)).await.unwrap();
        store.record_interaction(new_interaction("u2", 1)).await.unwrap();

        let history = store.interactions_for_user("u1").await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].user_id, "u1");
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryStore::default();
        store.record_interaction(new_interaction("u1", 1)).await.unwrap();
        store.record_interaction(new_interaction("u1", 2)).await.unwrap();
        store.record_interaction(new_interaction("u2", 2)).await.unwrap();

        assert_eq!(store.delete_interactions_for_user("u1").await.unwrap(), 2);
        assert_eq!(store.delete_interactions_for_user("u1").await.unwrap(), 0);
        assert_eq!(store.interactions_for_user("u2").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_product_keeps_interactions() {
        let store = MemoryStore::new(vec![product(1), product(2)]);
        store.record_interaction(new_interaction("u1", 1)).await.unwrap();

        store.remove_product(1).await;

        assert!(store.get_product(1).await.unwrap().is_none());
        assert_eq!(store.list_products().await.unwrap().len(), 1);
        assert_eq!(store.interactions_for_user("u1").await.unwrap().len(), 1);
    }
}
