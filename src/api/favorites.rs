use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::auth::{CurrentViewer, MaybeViewer};
use super::types::FavoriteStatus;
use super::{ApiError, AppState};
use crate::domain::CarId;
use crate::inventory::CarDto;

/// GET /user/favorites
pub async fn list_favorites(
    State(state): State<Arc<AppState>>,
    CurrentViewer(viewer): CurrentViewer,
) -> Result<Json<Vec<CarDto>>, ApiError> {
    let cars = state
        .customer_service()
        .favorites(&viewer.user_id)
        .await
        .map_err(ApiError::fetch_failed("Failed to fetch favorites"))?;

    Ok(Json(cars))
}

/// GET /user/favorites/{car_id}
///
/// Anonymous callers get `false` rather than an error.
pub async fn favorite_status(
    State(state): State<Arc<AppState>>,
    MaybeViewer(viewer): MaybeViewer,
    Path(car_id): Path<String>,
) -> Result<Json<FavoriteStatus>, ApiError> {
    let Some(viewer) = viewer else {
        return Ok(Json(FavoriteStatus { is_favorite: false }));
    };

    let is_favorite = state
        .customer_service()
        .is_favorite(&viewer.user_id, &CarId::from(car_id))
        .await
        .map_err(ApiError::fetch_failed("Failed to check favorite status"))?;

    Ok(Json(FavoriteStatus { is_favorite }))
}

/// POST /user/favorites/{car_id}
pub async fn toggle_favorite(
    State(state): State<Arc<AppState>>,
    CurrentViewer(viewer): CurrentViewer,
    Path(car_id): Path<String>,
) -> Result<Json<FavoriteStatus>, ApiError> {
    let is_favorite = state
        .customer_service()
        .toggle_favorite(&viewer.user_id, &CarId::from(car_id))
        .await
        .map_err(ApiError::fetch_failed("Failed to toggle favorite"))?;

    Ok(Json(FavoriteStatus { is_favorite }))
}
