use axum::{Json, extract::State};
use std::sync::Arc;

use super::auth::CurrentViewer;
use super::types::{PreferencesResponse, ProfileRequest, UserResponse};
use super::validation::validate_email;
use super::{ApiError, AppState};
use crate::models::preferences::PreferencesPatch;
use crate::services::ProfileUpdate;

/// GET /user/preferences
pub async fn get_preferences(
    State(state): State<Arc<AppState>>,
    CurrentViewer(viewer): CurrentViewer,
) -> Result<Json<PreferencesResponse>, ApiError> {
    let preferences = state
        .customer_service()
        .preferences(&viewer.user_id)
        .await
        .map_err(ApiError::fetch_failed("Failed to fetch preferences"))?;

    Ok(Json(PreferencesResponse { preferences }))
}

/// PUT /user/preferences
pub async fn update_preferences(
    State(state): State<Arc<AppState>>,
    CurrentViewer(viewer): CurrentViewer,
    Json(patch): Json<PreferencesPatch>,
) -> Result<Json<PreferencesResponse>, ApiError> {
    if patch.max_price.is_some_and(|p| p < 0) {
        return Err(ApiError::validation("maxPrice must not be negative"));
    }

    let preferences = state
        .customer_service()
        .update_preferences(&viewer.user_id, patch)
        .await
        .map_err(ApiError::fetch_failed("Failed to update preferences"))?;

    Ok(Json(PreferencesResponse { preferences }))
}

/// PUT /user/profile
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    CurrentViewer(viewer): CurrentViewer,
    Json(payload): Json<ProfileRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    if let Some(email) = payload.email.as_deref()
        && !email.trim().is_empty()
    {
        validate_email(email)?;
    }

    let user = state
        .auth_service()
        .update_profile(
            &viewer.user_id,
            ProfileUpdate {
                name: payload.name,
                email: payload.email,
                phone: payload.phone,
            },
        )
        .await
        .map_err(ApiError::fetch_failed("Failed to update profile"))?;

    Ok(Json(UserResponse { user }))
}
