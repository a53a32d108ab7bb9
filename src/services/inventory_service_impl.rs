//! `SeaORM` implementation of the `InventoryService` trait.

use crate::config::Config;
use crate::db::Store;
use crate::domain::{CarId, Visibility};
use crate::inventory::{CarDto, CarFilter, SimilarQuery, predicate, shape};
use crate::models::car::{CarChanges, NewCar};
use crate::services::image::{ImageService, ImageSize};
use crate::services::inventory_service::{InventoryError, InventoryService};
use async_trait::async_trait;
use tracing::{debug, info};

pub struct SeaOrmInventoryService {
    store: Store,
    images: ImageService,
    featured_limit: u64,
}

impl SeaOrmInventoryService {
    #[must_use]
    pub fn new(store: Store, config: &Config) -> Self {
        Self {
            store,
            images: ImageService::new(&config.media),
            featured_limit: config.inventory.featured_limit,
        }
    }
}

fn check_amounts(price: Option<i64>, mileage: Option<i64>) -> Result<(), InventoryError> {
    if price.is_some_and(|p| p < 0) {
        return Err(InventoryError::Validation(
            "price must not be negative".to_string(),
        ));
    }
    if mileage.is_some_and(|m| m < 0) {
        return Err(InventoryError::Validation(
            "mileage must not be negative".to_string(),
        ));
    }
    Ok(())
}

#[async_trait]
impl InventoryService for SeaOrmInventoryService {
    async fn search(
        &self,
        filter: &CarFilter,
        visibility: Visibility,
    ) -> Result<Vec<CarDto>, InventoryError> {
        let rows = self
            .store
            .search_cars(
                predicate::listing_condition(filter, visibility),
                predicate::listing_order(),
                None,
            )
            .await?;

        debug!(count = rows.len(), ?visibility, "Car search completed");
        Ok(shape::shape_all(rows))
    }

    async fn similar(&self, query: &SimilarQuery) -> Result<Vec<CarDto>, InventoryError> {
        let rows = self
            .store
            .search_cars(
                predicate::similar_condition(query),
                predicate::similar_order(query),
                Some(query.limit),
            )
            .await?;

        Ok(shape::shape_all(rows))
    }

    async fn featured(&self) -> Result<Vec<CarDto>, InventoryError> {
        let rows = self
            .store
            .search_cars(
                predicate::listing_condition(&CarFilter::default(), Visibility::Public),
                predicate::listing_order(),
                Some(self.featured_limit),
            )
            .await?;

        Ok(shape::shape_all(rows))
    }

    async fn get(&self, id: &CarId) -> Result<CarDto, InventoryError> {
        self.store
            .get_car(id.as_str())
            .await?
            .map(CarDto::from)
            .ok_or(InventoryError::NotFound)
    }

    async fn create(&self, car: NewCar) -> Result<CarDto, InventoryError> {
        check_amounts(Some(car.price), Some(car.mileage))?;

        let model = self.store.add_car(car).await?;
        Ok(CarDto::from(model))
    }

    async fn update(&self, id: &CarId, changes: CarChanges) -> Result<CarDto, InventoryError> {
        check_amounts(changes.price, changes.mileage)?;

        self.store
            .update_car(id.as_str(), changes)
            .await?
            .map(CarDto::from)
            .ok_or(InventoryError::NotFound)
    }

    async fn delete(&self, id: &CarId) -> Result<(), InventoryError> {
        let car = self.get(id).await?;
        if !self.store.remove_car(id.as_str()).await? {
            return Err(InventoryError::NotFound);
        }

        let assets = self.images.cdn_public_ids(&car.images);
        if !assets.is_empty() {
            info!(car_id = %id.as_str(), ?assets, "Removed car left unreferenced CDN assets");
        }
        Ok(())
    }

    async fn record_view(&self, id: &CarId) -> Result<i64, InventoryError> {
        let count = self
            .store
            .increment_car_views(id.as_str())
            .await?
            .ok_or(InventoryError::NotFound)?;

        metrics::counter!("car_views_total").increment(1);
        Ok(count)
    }

    async fn view_count(&self, id: &CarId) -> Result<i64, InventoryError> {
        Ok(self
            .store
            .get_car_view_count(id.as_str())
            .await?
            .unwrap_or(0))
    }

    async fn main_image_url(&self, id: &CarId, size: ImageSize) -> Result<String, InventoryError> {
        let car = self.get(id).await?;
        Ok(self.images.main_image_url(&car.images, size))
    }
}
