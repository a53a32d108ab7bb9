use crate::domain::{BodyType, FuelType, Transmission};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "cars")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    /// Whole currency units.
    pub price: i64,
    pub mileage: i64,
    pub color: String,
    pub fuel_type: FuelType,
    pub transmission: Transmission,
    pub body_type: BodyType,
    /// JSON array of image URLs; the first entry is the main image.
    pub images: String,
    pub description: String,
    /// JSON array of feature strings.
    pub features: String,
    pub is_available: bool,
    pub view_count: i64,
    /// Unicode lower-cased copies of the text columns searched
    /// case-insensitively. `SQLite`'s `lower()` only folds ASCII.
    pub make_folded: String,
    pub model_folded: String,
    pub color_folded: String,
    pub description_folded: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::inquiries::Entity")]
    Inquiries,
    #[sea_orm(has_many = "super::favorite_cars::Entity")]
    FavoriteCars,
}

impl Related<super::inquiries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Inquiries.def()
    }
}

impl Related<super::favorite_cars::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FavoriteCars.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
