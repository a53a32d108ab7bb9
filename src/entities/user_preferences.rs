use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_preferences")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    pub email_notifications: bool,
    pub sms_notifications: bool,
    pub price_alerts: bool,
    pub new_arrivals: bool,
    pub marketing_notifications: bool,
    pub max_price: Option<i64>,
    /// JSON arrays of strings.
    pub preferred_makes: String,
    pub preferred_fuel_types: String,
    pub preferred_body_types: String,
    pub profile_visible: bool,
    pub show_email: bool,
    pub show_phone: bool,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
