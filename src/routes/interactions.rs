use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{Interaction, NewInteraction},
    routes::AppState,
};

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub message: String,
    pub deleted: u64,
}

/// Handler recording one interaction
pub async fn record_interaction(
    State(state): State<Arc<AppState>>,
    request: Result<Json<NewInteraction>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Interaction>)> {
    let Json(request) = request?;
    if request.user_id.trim().is_empty() {
        return Err(AppError::InvalidInput("user_id cannot be empty".to_string()));
    }

    let interaction = state.interactions.record_interaction(request).await?;

    tracing::info!(
        user_id = %interaction.user_id,
        product_id = interaction.product_id,
        interaction_type = %interaction.interaction_type,
        "Interaction recorded"
    );

    Ok((StatusCode::CREATED, Json(interaction)))
}

/// Handler listing a user's interactions
pub async fn list_user_interactions(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<Interaction>>> {
    let interactions = state.interactions.interactions_for_user(&user_id).await?;
    Ok(Json(interactions))
}

/// Handler deleting all of a user's interactions
///
/// Succeeds even when the user has nothing to delete.
pub async fn reset_user_interactions(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> AppResult<Json<ResetResponse>> {
    let deleted = state
        .interactions
        .delete_interactions_for_user(&user_id)
        .await?;

    tracing::info!(user_id = %user_id, deleted, "Interactions reset");

    Ok(Json(ResetResponse {
        message: "All interactions reset successfully".to_string(),
        deleted,
    }))
}
