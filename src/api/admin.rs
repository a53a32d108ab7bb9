//! Back-office endpoints. Every route here sits behind the admin gate.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use super::types::{CarPayload, CurrencyRequest, StatusRequest, SuccessResponse};
use super::validation::{parse_category, require, require_value};
use super::{ApiError, AppState};
use crate::domain::{CarId, Currency, InquiryStatus, Visibility};
use crate::inventory::{CarDto, RawCarFilter};
use crate::models::car::{CarChanges, NewCar};
use crate::models::inquiry::{DashboardStats, InquiryDto};
use crate::models::user::UserDto;
use crate::services::CurrencySetting;

impl CarPayload {
    fn into_new_car(self) -> Result<NewCar, ApiError> {
        Ok(NewCar {
            make: require(self.make.as_deref(), "make")?.to_string(),
            model: require(self.model.as_deref(), "model")?.to_string(),
            year: require_value(self.year, "year")?,
            price: require_value(self.price, "price")?,
            mileage: require_value(self.mileage, "mileage")?,
            color: require(self.color.as_deref(), "color")?.to_string(),
            fuel_type: parse_category(require(self.fuel_type.as_deref(), "fuelType")?, "fuelType")?,
            transmission: parse_category(
                require(self.transmission.as_deref(), "transmission")?,
                "transmission",
            )?,
            body_type: parse_category(require(self.body_type.as_deref(), "bodyType")?, "bodyType")?,
            images: self.images.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            features: self.features.unwrap_or_default(),
            is_available: self.is_available.unwrap_or(true),
        })
    }

    fn into_changes(self) -> Result<CarChanges, ApiError> {
        Ok(CarChanges {
            make: self.make,
            model: self.model,
            year: self.year,
            price: self.price,
            mileage: self.mileage,
            color: self.color,
            fuel_type: self
                .fuel_type
                .map(|v| parse_category(&v, "fuelType"))
                .transpose()?,
            transmission: self
                .transmission
                .map(|v| parse_category(&v, "transmission"))
                .transpose()?,
            body_type: self
                .body_type
                .map(|v| parse_category(&v, "bodyType"))
                .transpose()?,
            images: self.images,
            description: self.description,
            features: self.features,
            is_available: self.is_available,
        })
    }
}

/// GET /admin/cars
///
/// Same filters as the public listing, sold cars included.
pub async fn list_cars(
    State(state): State<Arc<AppState>>,
    Query(raw): Query<RawCarFilter>,
) -> Result<Json<Vec<CarDto>>, ApiError> {
    let cars = state
        .inventory_service()
        .search(&raw.normalize(), Visibility::Admin)
        .await
        .map_err(ApiError::fetch_failed("Failed to fetch cars"))?;

    Ok(Json(cars))
}

/// POST /admin/cars
pub async fn create_car(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CarPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let car = state
        .inventory_service()
        .create(payload.into_new_car()?)
        .await?;

    tracing::info!(car_id = %car.id, make = %car.make, model = %car.model, "Car created");
    Ok((StatusCode::CREATED, Json(car)))
}

/// GET /admin/cars/{id}
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

/// PUT /admin/cars/{id}
pub async fn update_car(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<CarPayload>,
) -> Result<Json<CarDto>, ApiError> {
    let car = state
        .inventory_service()
        .update(&CarId::from(id), payload.into_changes()?)
        .await?;

    tracing::info!(car_id = %car.id, "Car updated");
    Ok(Json(car))
}

/// DELETE /admin/cars/{id}
pub async fn delete_car(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let id = CarId::from(id);
    state.inventory_service().delete(&id).await?;

    tracing::info!(car_id = %id, "Car deleted");
    Ok(Json(SuccessResponse::OK))
}

/// GET /admin/stats
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardStats>, ApiError> {
    let stats = state
        .inquiry_service()
        .dashboard_stats()
        .await
        .map_err(ApiError::fetch_failed("Failed to fetch stats"))?;

    Ok(Json(stats))
}

/// GET /admin/users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserDto>>, ApiError> {
    let users = state
        .auth_service()
        .list_users()
        .await
        .map_err(ApiError::fetch_failed("Failed to fetch users"))?;

    Ok(Json(users))
}

/// GET /admin/inquiries
pub async fn list_inquiries(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<InquiryDto>>, ApiError> {
    let inquiries = state
        .inquiry_service()
        .list_all()
        .await
        .map_err(ApiError::fetch_failed("Failed to fetch inquiries"))?;

    Ok(Json(inquiries))
}

/// PATCH /admin/inquiries/{id}
pub async fn update_inquiry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<StatusRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let status = payload
        .status
        .as_deref()
        .and_then(|s| s.parse::<InquiryStatus>().ok())
        .ok_or_else(|| ApiError::validation("Invalid status"))?;

    state.inquiry_service().set_status(&id, status).await?;

    Ok(Json(SuccessResponse::OK))
}

/// GET /admin/currency
pub async fn get_currency(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CurrencySetting>, ApiError> {
    let setting = state
        .settings_service()
        .currency()
        .await
        .map_err(ApiError::fetch_failed("Failed to fetch currency settings"))?;

    Ok(Json(setting))
}

/// POST /admin/currency
///
/// Accepts the exact codes `USD` and `NGN`.
pub async fn set_currency(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CurrencyRequest>,
) -> Result<Json<CurrencySetting>, ApiError> {
    let currency = payload
        .currency
        .as_deref()
        .and_then(|c| c.parse::<Currency>().ok())
        .ok_or_else(|| ApiError::validation("Invalid currency"))?;

    let setting = state.settings_service().set_currency(currency).await?;

    Ok(Json(setting))
}
