use anyhow::{Context, Result};
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, Set};

use crate::domain::timestamp_now;
use crate::entities::{prelude::*, settings};

pub struct SettingsRepository {
    conn: DatabaseConnection,
}

impl SettingsRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, key: &str) -> Result<Option<settings::Model>> {
        Settings::find_by_id(key)
            .one(&self.conn)
            .await
            .with_context(|| format!("Failed to query setting {key}"))
    }

    /// Inserts or replaces `key`; returns the stored row.
    pub async fn set(&self, key: &str, value: &str) -> Result<settings::Model> {
        let model = settings::Model {
            key: key.to_string(),
            value: value.to_string(),
            updated_at: timestamp_now(),
        };

        let active_model = settings::ActiveModel {
            key: Set(model.key.clone()),
            value: Set(model.value.clone()),
            updated_at: Set(model.updated_at.clone()),
        };

        Settings::insert(active_model)
            .on_conflict(
                OnConflict::column(settings::Column::Key)
                    .update_columns([settings::Column::Value, settings::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec(&self.conn)
            .await
            .with_context(|| format!("Failed to save setting {key}"))?;

        Ok(model)
    }
}
