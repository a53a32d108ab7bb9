use crate::domain::{CarId, timestamp_now};
use crate::entities::{cars, prelude::*};
use crate::inventory::predicate::fold_case;
use crate::inventory::shape::encode_list;
use crate::models::car::{CarChanges, NewCar};
use anyhow::{Context, Result};
use sea_orm::sea_query::{Expr, Order, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::info;

pub struct CarRepository {
    conn: DatabaseConnection,
}

impl CarRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn search(
        &self,
        condition: Condition,
        order: Vec<(SimpleExpr, Order)>,
        limit: Option<u64>,
    ) -> Result<Vec<cars::Model>> {
        let mut query = Cars::find().filter(condition);
        for (expr, direction) in order {
            query = query.order_by(expr, direction);
        }
        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        query.all(&self.conn).await.context("Failed to query cars")
    }

    pub async fn get(&self, id: &str) -> Result<Option<cars::Model>> {
        Cars::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query car by ID")
    }

    pub async fn insert(&self, car: NewCar) -> Result<cars::Model> {
        let now = timestamp_now();

        let active_model = cars::ActiveModel {
            id: Set(CarId::generate().into_inner()),
            make_folded: Set(fold_case(&car.make)),
            model_folded: Set(fold_case(&car.model)),
            color_folded: Set(fold_case(&car.color)),
            description_folded: Set(fold_case(&car.description)),
            make: Set(car.make),
            model: Set(car.model),
            year: Set(car.year),
            price: Set(car.price),
            mileage: Set(car.mileage),
            color: Set(car.color),
            fuel_type: Set(car.fuel_type),
            transmission: Set(car.transmission),
            body_type: Set(car.body_type),
            images: Set(encode_list(&car.images)),
            description: Set(car.description),
            features: Set(encode_list(&car.features)),
            is_available: Set(car.is_available),
            view_count: Set(0),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        let model = active_model
            .insert(&self.conn)
            .await
            .context("Failed to insert car")?;

        info!(car_id = %model.id, make = %model.make, model = %model.model, "Added car");
        Ok(model)
    }

    /// Applies `changes` and bumps `updated_at`. `None` when the car does not
    /// exist.
    pub async fn update(&self, id: &str, changes: CarChanges) -> Result<Option<cars::Model>> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        let mut active: cars::ActiveModel = existing.into();
        if let Some(make) = changes.make {
            active.make_folded = Set(fold_case(&make));
            active.make = Set(make);
        }
        if let Some(model) = changes.model {
            active.model_folded = Set(fold_case(&model));
            active.model = Set(model);
        }
        if let Some(year) = changes.year {
            active.year = Set(year);
        }
        if let Some(price) = changes.price {
            active.price = Set(price);
        }
        if let Some(mileage) = changes.mileage {
            active.mileage = Set(mileage);
        }
        if let Some(color) = changes.color {
            active.color_folded = Set(fold_case(&color));
            active.color = Set(color);
        }
        if let Some(fuel_type) = changes.fuel_type {
            active.fuel_type = Set(fuel_type);
        }
        if let Some(transmission) = changes.transmission {
            active.transmission = Set(transmission);
        }
        if let Some(body_type) = changes.body_type {
            active.body_type = Set(body_type);
        }
        if let Some(images) = changes.images {
            active.images = Set(encode_list(&images));
        }
        if let Some(description) = changes.description {
            active.description_folded = Set(fold_case(&description));
            active.description = Set(description);
        }
        if let Some(features) = changes.features {
            active.features = Set(encode_list(&features));
        }
        if let Some(is_available) = changes.is_available {
            active.is_available = Set(is_available);
        }
        active.updated_at = Set(timestamp_now());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update car")?;

        Ok(Some(model))
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = Cars::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete car")?;

        let removed = result.rows_affected > 0;
        if removed {
            info!(car_id = %id, "Removed car");
        }
        Ok(removed)
    }

    /// Atomically adds one view. Returns the new count, or `None` when the car
    /// does not exist.
    pub async fn increment_views(&self, id: &str) -> Result<Option<i64>> {
        let result = Cars::update_many()
            .col_expr(
                cars::Column::ViewCount,
                Expr::col(cars::Column::ViewCount).add(1),
            )
            .filter(cars::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("Failed to record car view")?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.view_count(id).await
    }

    pub async fn view_count(&self, id: &str) -> Result<Option<i64>> {
        Cars::find_by_id(id)
            .select_only()
            .column(cars::Column::ViewCount)
            .into_tuple::<i64>()
            .one(&self.conn)
            .await
            .context("Failed to query car view count")
    }

    pub async fn count(&self, available_only: bool) -> Result<u64> {
        let mut query = Cars::find();
        if available_only {
            query = query.filter(cars::Column::IsAvailable.eq(true));
        }

        query.count(&self.conn).await.context("Failed to count cars")
    }
}
