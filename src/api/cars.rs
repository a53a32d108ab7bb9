//! Public inventory endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    response::Redirect,
};
use std::sync::Arc;

use super::types::{ImageQuery, RecordedViewResponse, ViewCountResponse};
use super::{ApiError, AppState};
use crate::domain::{CarId, Visibility};
use crate::inventory::{CarDto, RawCarFilter, RawSimilarQuery};
use crate::services::ImageSize;

/// GET /cars
///
/// Available listings matching the query filters, newest first.
pub async fn list_cars(
    State(state): State<Arc<AppState>>,
    Query(raw): Query<RawCarFilter>,
) -> Result<Json<Vec<CarDto>>, ApiError> {
    let cars = state
        .inventory_service()
        .search(&raw.normalize(), Visibility::Public)
        .await
        .map_err(ApiError::fetch_failed("Failed to fetch cars"))?;

    Ok(Json(cars))
}

/// GET /cars/similar
pub async fn similar_cars(
    State(state): State<Arc<AppState>>,
    Query(raw): Query<RawSimilarQuery>,
) -> Result<Json<Vec<CarDto>>, ApiError> {
    let query = raw
        .normalize(state.shared.similar_limits().await)
        .map_err(ApiError::validation)?;

    let cars = state
        .inventory_service()
        .similar(&query)
        .await
        .map_err(ApiError::fetch_failed("Failed to fetch similar cars"))?;

    Ok(Json(cars))
}

/// GET /cars/featured
pub async fn featured_cars(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CarDto>>, ApiError> {
    let cars = state
        .inventory_service()
        .featured()
        .await
        .map_err(ApiError::fetch_failed("Failed to fetch featured cars"))?;

    Ok(Json(cars))
}

/// GET /cars/{id}
///
/// Sold listings are returned too so that bookmarked links keep working.
pub async fn get_car(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CarDto>, ApiError> {
    let car = state
        .inventory_service()
        .get(&CarId::from(id))
        .await
        .map_err(ApiError::fetch_failed("Failed to fetch car"))?;

    Ok(Json(car))
}

/// POST /cars/{id}/view
pub async fn record_view(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<RecordedViewResponse>, ApiError> {
    let view_count = state
        .inventory_service()
        .record_view(&CarId::from(id))
        .await
        .map_err(ApiError::fetch_failed("Failed to update view count"))?;

    Ok(Json(RecordedViewResponse {
        success: true,
        view_count,
    }))
}

/// GET /cars/{id}/view
pub async fn get_view_count(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ViewCountResponse>, ApiError> {
    let view_count = state
        .inventory_service()
        .view_count(&CarId::from(id))
        .await
        .map_err(ApiError::fetch_failed("Failed to fetch view count"))?;

    Ok(Json(ViewCountResponse { view_count }))
}

/// GET /cars/{id}/image?size=card
///
/// Redirects to the sized main image, or to the placeholder when the listing
/// has no images. Unknown sizes fall back to `card`.
pub async fn car_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<ImageQuery>,
) -> Result<Redirect, ApiError> {
    let size = query
        .size
        .as_deref()
        .and_then(|s| s.parse::<ImageSize>().ok())
        .unwrap_or_default();

    let url = state
        .inventory_service()
        .main_image_url(&CarId::from(id), size)
        .await
        .map_err(ApiError::fetch_failed("Failed to fetch car"))?;

    Ok(Redirect::temporary(&url))
}
