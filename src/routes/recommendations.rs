use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Extension, Json,
};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{Recommendation, RecommendationQuery},
    routes::AppState,
};

/// Handler for recommendations endpoint
pub async fn get_recommendations(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<String>,
    query: Result<Query<RecommendationQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Recommendation>>> {
    let Query(query) = query?;
    let limit = query.limit.unwrap_or(state.limits.default);
    if limit > state.limits.max {
        return Err(AppError::InvalidInput(format!(
            "limit must be at most {}",
            state.limits.max
        )));
    }

    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        limit,
        "Processing recommendation request"
    );

    let recommendations = state.recommender.recommend(&user_id, limit).await?;

    tracing::info!(
        request_id = %request_id,
        returned = recommendations.len(),
        "Recommendations completed"
    );

    Ok(Json(recommendations))
}
