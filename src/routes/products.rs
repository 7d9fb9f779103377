use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{Product, ProductId},
    routes::AppState,
};

/// Handler listing the catalog, most popular first
pub async fn list_products(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Product>>> {
    let mut products = state.catalog.list_products().await?;
    products.sort_by(|a, b| b.popularity.total_cmp(&a.popularity));

    tracing::debug!(count = products.len(), "Listed products");

    Ok(Json(products))
}

/// Handler for a single product
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<ProductId>,
) -> AppResult<Json<Product>> {
    state
        .catalog
        .get_product(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Product {} not found", id)))
}
