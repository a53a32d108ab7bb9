use crate::entities::prelude::*;
use crate::entities::{cars, favorite_cars, inquiries};
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Users)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(UserPreferences)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Cars)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Inquiries)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(FavoriteCars)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // One favorite row per (user, car)
        manager
            .create_index(
                Index::create()
                    .name("idx_favorite_cars_user_car")
                    .table(FavoriteCars)
                    .col(favorite_cars::Column::UserId)
                    .col(favorite_cars::Column::CarId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cars_available_created")
                    .table(Cars)
                    .col(cars::Column::IsAvailable)
                    .col(cars::Column::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_inquiries_user")
                    .table(Inquiries)
                    .col(inquiries::Column::UserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FavoriteCars).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Inquiries).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cars).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserPreferences).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users).to_owned())
            .await?;

        Ok(())
    }
}
