use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

pub mod interactions;
pub mod products;
pub mod recommendations;
pub mod state;

pub use state::{AppState, RecommendationLimits};

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(Arc::new(state))
}

/// API routes under /api
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/products", get(products::list_products))
        .route("/products/:id", get(products::get_product))
        .route(
            "/recommendations/:user_id",
            get(recommendations::get_recommendations),
        )
        .route("/interactions", post(interactions::record_interaction))
        .route(
            "/interactions/user/:user_id",
            get(interactions::list_user_interactions).delete(interactions::reset_user_interactions),
        )
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
