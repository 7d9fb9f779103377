use serde::{Deserialize, Serialize};

/// Catalog identifier of a product
pub type ProductId = i64;

/// A sellable product as returned by the catalog store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    /// Unit price in the store currency
    pub price: f64,
    #[serde(default)]
    pub description: String,
    /// Relative popularity, absent values count as 0
    #[serde(default)]
    pub popularity: f64,
}

/// A product ranked by the scoring engine
///
/// The score is derived per request and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredProduct {
    #[serde(flatten)]
    pub product: Product,
    pub score: f64,
}
