//! Domain service for site-wide settings managed from the back-office.

use crate::domain::Currency;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for SettingsError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencySetting {
    pub currency: Currency,
    /// Absent until an admin first saves a currency.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[async_trait::async_trait]
pub trait SettingsService: Send + Sync {
    /// The display currency; USD until one is saved.
    async fn currency(&self) -> Result<CurrencySetting, SettingsError>;

    async fn set_currency(&self, currency: Currency) -> Result<CurrencySetting, SettingsError>;
}
