//! Domain service for the vehicle inventory.
//!
//! Runs the listing read path (normalized filter, composed predicate, store,
//! shaper) and the admin write path over the same store.

use crate::domain::{CarId, Visibility};
use crate::inventory::{CarDto, CarFilter, SimilarQuery};
use crate::models::car::{CarChanges, NewCar};
use crate::services::image::ImageSize;
use thiserror::Error;

/// Errors specific to inventory operations.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Car not found")]
    NotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for InventoryError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for InventoryError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

/// Domain service trait for the inventory.
#[async_trait::async_trait]
pub trait InventoryService: Send + Sync {
    /// Listings matching `filter`, newest first.
    ///
    /// [`Visibility::Public`] hides sold listings; [`Visibility::Admin`]
    /// returns them too.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::Database`] when the store cannot be queried.
    async fn search(
        &self,
        filter: &CarFilter,
        visibility: Visibility,
    ) -> Result<Vec<CarDto>, InventoryError>;

    /// Available listings resembling a given one: make matches first, then
    /// body-style matches, then the most recent.
    async fn similar(&self, query: &SimilarQuery) -> Result<Vec<CarDto>, InventoryError>;

    /// Newest available listings for the storefront.
    async fn featured(&self) -> Result<Vec<CarDto>, InventoryError>;

    /// A single listing regardless of availability.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::NotFound`] if no listing has this id.
    async fn get(&self, id: &CarId) -> Result<CarDto, InventoryError>;

    /// # Errors
    ///
    /// Returns [`InventoryError::Validation`] for negative prices or mileage.
    async fn create(&self, car: NewCar) -> Result<CarDto, InventoryError>;

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::NotFound`] if no listing has this id.
    async fn update(&self, id: &CarId, changes: CarChanges) -> Result<CarDto, InventoryError>;

    async fn delete(&self, id: &CarId) -> Result<(), InventoryError>;

    /// Adds one view and returns the new count.
    async fn record_view(&self, id: &CarId) -> Result<i64, InventoryError>;

    /// Current view count; 0 for unknown listings.
    async fn view_count(&self, id: &CarId) -> Result<i64, InventoryError>;

    /// URL of the `size` derivative of the listing's main image, or the
    /// placeholder when it has none.
    async fn main_image_url(&self, id: &CarId, size: ImageSize) -> Result<String, InventoryError>;
}
