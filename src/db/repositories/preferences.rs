use crate::domain::timestamp_now;
use crate::entities::{prelude::*, user_preferences};
use crate::inventory::shape::encode_list;
use crate::models::preferences::Preferences;
use anyhow::{Context, Result};
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, Set};

pub struct PreferencesRepository {
    conn: DatabaseConnection,
}

impl PreferencesRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Stored preferences, or `None` when the user never saved any.
    pub async fn get(&self, user_id: &str) -> Result<Option<Preferences>> {
        let row = UserPreferences::find_by_id(user_id)
            .one(&self.conn)
            .await
            .context("Failed to query user preferences")?;

        Ok(row.map(Preferences::from))
    }

    pub async fn upsert(&self, user_id: &str, preferences: &Preferences) -> Result<()> {
        let active_model = user_preferences::ActiveModel {
            user_id: Set(user_id.to_string()),
            email_notifications: Set(preferences.email_notifications),
            sms_notifications: Set(preferences.sms_notifications),
            price_alerts: Set(preferences.price_alerts),
            new_arrivals: Set(preferences.new_arrivals),
            marketing_notifications: Set(preferences.marketing_notifications),
            max_price: Set(preferences.max_price),
            preferred_makes: Set(encode_list(&preferences.preferred_makes)),
            preferred_fuel_types: Set(encode_list(&preferences.preferred_fuel_types)),
            preferred_body_types: Set(encode_list(&preferences.preferred_body_types)),
            profile_visible: Set(preferences.profile_visible),
            show_email: Set(preferences.show_email),
            show_phone: Set(preferences.show_phone),
            updated_at: Set(timestamp_now()),
        };

        UserPreferences::insert(active_model)
            .on_conflict(
                OnConflict::column(user_preferences::Column::UserId)
                    .update_columns([
                        user_preferences::Column::EmailNotifications,
                        user_preferences::Column::SmsNotifications,
                        user_preferences::Column::PriceAlerts,
                        user_preferences::Column::NewArrivals,
                        user_preferences::Column::MarketingNotifications,
                        user_preferences::Column::MaxPrice,
                        user_preferences::Column::PreferredMakes,
                        user_preferences::Column::PreferredFuelTypes,
                        user_preferences::Column::PreferredBodyTypes,
                        user_preferences::Column::ProfileVisible,
                        user_preferences::Column::ShowEmail,
                        user_preferences::Column::ShowPhone,
                        user_preferences::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await
            .context("Failed to save user preferences")?;

        Ok(())
    }
}
