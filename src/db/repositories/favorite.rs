use crate::domain::timestamp_now;
use crate::entities::{cars, favorite_cars, prelude::*};
use anyhow::{Context, Result};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

pub struct FavoriteRepository {
    conn: DatabaseConnection,
}

impl FavoriteRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    async fn find(&self, user_id: &str, car_id: &str) -> Result<Option<favorite_cars::Model>> {
        FavoriteCars::find()
            .filter(favorite_cars::Column::UserId.eq(user_id))
            .filter(favorite_cars::Column::CarId.eq(car_id))
            .one(&self.conn)
            .await
            .context("Failed to query favorite")
    }

    pub async fn exists(&self, user_id: &str, car_id: &str) -> Result<bool> {
        Ok(self.find(user_id, car_id).await?.is_some())
    }

    /// Deletes the favorite if present, creates it otherwise. Returns whether
    /// the car is a favorite afterwards.
    pub async fn toggle(&self, user_id: &str, car_id: &str) -> Result<bool> {
        if let Some(existing) = self.find(user_id, car_id).await? {
            FavoriteCars::delete_by_id(existing.id)
                .exec(&self.conn)
                .await
                .context("Failed to remove favorite")?;
            return Ok(false);
        }

        let active_model = favorite_cars::ActiveModel {
            user_id: Set(user_id.to_string()),
            car_id: Set(car_id.to_string()),
            created_at: Set(timestamp_now()),
            ..Default::default()
        };

        // A concurrent toggle may have inserted the same pair already
        FavoriteCars::insert(active_model)
            .on_conflict(
                OnConflict::columns([favorite_cars::Column::UserId, favorite_cars::Column::CarId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await
            .context("Failed to add favorite")?;

        Ok(true)
    }

    /// The user's favorite cars, most recently favorited first.
    pub async fn list_cars(&self, user_id: &str) -> Result<Vec<cars::Model>> {
        let rows = FavoriteCars::find()
            .filter(favorite_cars::Column::UserId.eq(user_id))
            .order_by_desc(favorite_cars::Column::CreatedAt)
            .order_by_desc(favorite_cars::Column::Id)
            .find_also_related(Cars)
            .all(&self.conn)
            .await
            .context("Failed to query favorite cars")?;

        Ok(rows.into_iter().filter_map(|(_, car)| car).collect())
    }
}
