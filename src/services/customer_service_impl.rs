//! `SeaORM` implementation of the `CustomerService` trait.

use crate::db::Store;
use crate::domain::{CarId, UserId};
use crate::inventory::{CarDto, shape};
use crate::models::preferences::{Preferences, PreferencesPatch};
use crate::services::customer_service::{CustomerError, CustomerService};
use async_trait::async_trait;
use tracing::debug;

pub struct SeaOrmCustomerService {
    store: Store,
}

impl SeaOrmCustomerService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CustomerService for SeaOrmCustomerService {
    async fn favorites(&self, user_id: &UserId) -> Result<Vec<CarDto>, CustomerError> {
        let cars = self.store.list_favorite_cars(user_id.as_str()).await?;
        Ok(shape::shape_all(cars))
    }

    async fn is_favorite(&self, user_id: &UserId, car_id: &CarId) -> Result<bool, CustomerError> {
        Ok(self
            .store
            .is_favorite(user_id.as_str(), car_id.as_str())
            .await?)
    }

    async fn toggle_favorite(
        &self,
        user_id: &UserId,
        car_id: &CarId,
    ) -> Result<bool, CustomerError> {
        if self.store.get_car(car_id.as_str()).await?.is_none() {
            return Err(CustomerError::CarNotFound);
        }

        let is_favorite = self
            .store
            .toggle_favorite(user_id.as_str(), car_id.as_str())
            .await?;

        metrics::counter!("favorite_toggles_total").increment(1);
        debug!(user_id = %user_id, car_id = %car_id, is_favorite, "Favorite toggled");
        Ok(is_favorite)
    }

    async fn preferences(&self, user_id: &UserId) -> Result<Preferences, CustomerError> {
        Ok(self
            .store
            .get_preferences(user_id.as_str())
            .await?
            .unwrap_or_default())
    }

    async fn update_preferences(
        &self,
        user_id: &UserId,
        patch: PreferencesPatch,
    ) -> Result<Preferences, CustomerError> {
        let mut preferences = self.preferences(user_id).await?;
        preferences.apply(patch);

        self.store
            .save_preferences(user_id.as_str(), &preferences)
            .await?;

        Ok(preferences)
    }
}
