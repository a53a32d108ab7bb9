//! Domain service for a signed-in customer's own data: favorite listings and
//! preferences.

use crate::domain::{CarId, UserId};
use crate::inventory::CarDto;
use crate::models::preferences::{Preferences, PreferencesPatch};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CustomerError {
    #[error("Car not found")]
    CarNotFound,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for CustomerError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for CustomerError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

#[async_trait::async_trait]
pub trait CustomerService: Send + Sync {
    async fn favorites(&self, user_id: &UserId) -> Result<Vec<CarDto>, CustomerError>;

    async fn is_favorite(&self, user_id: &UserId, car_id: &CarId) -> Result<bool, CustomerError>;

    /// Flips the favorite state of a listing and returns the new state.
    /// Toggling twice restores the original state.
    ///
    /// # Errors
    ///
    /// Returns [`CustomerError::CarNotFound`] for unknown listings.
    async fn toggle_favorite(
        &self,
        user_id: &UserId,
        car_id: &CarId,
    ) -> Result<bool, CustomerError>;

    /// Saved preferences, or the defaults when none were saved.
    async fn preferences(&self, user_id: &UserId) -> Result<Preferences, CustomerError>;

    /// Merges `patch` over the current preferences and saves the result.
    async fn update_preferences(
        &self,
        user_id: &UserId,
        patch: PreferencesPatch,
    ) -> Result<Preferences, CustomerError>;
}
