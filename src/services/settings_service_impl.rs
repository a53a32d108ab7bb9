//! `SeaORM` implementation of the `SettingsService` trait.

use crate::db::Store;
use crate::domain::Currency;
use crate::services::settings_service::{CurrencySetting, SettingsError, SettingsService};
use async_trait::async_trait;
use tracing::{info, warn};

const CURRENCY_KEY: &str = "currency";

pub struct SeaOrmSettingsService {
    store: Store,
}

impl SeaOrmSettingsService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SettingsService for SeaOrmSettingsService {
    async fn currency(&self) -> Result<CurrencySetting, SettingsError> {
        let Some(row) = self.store.get_setting(CURRENCY_KEY).await? else {
            return Ok(CurrencySetting {
                currency: Currency::default(),
                updated_at: None,
            });
        };

        let currency = row.value.parse().unwrap_or_else(|e| {
            warn!(error = %e, "Stored currency is invalid, using default");
            Currency::default()
        });

        Ok(CurrencySetting {
            currency,
            updated_at: Some(row.updated_at),
        })
    }

    async fn set_currency(&self, currency: Currency) -> Result<CurrencySetting, SettingsError> {
        let row = self.store.set_setting(CURRENCY_KEY, currency.code()).await?;

        info!(%currency, "Display currency changed");
        Ok(CurrencySetting {
            currency,
            updated_at: Some(row.updated_at),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn currency_defaults_to_usd_and_persists() {
        let store = Store::new("sqlite::memory:").await.unwrap();
        let service = SeaOrmSettingsService::new(store.clone());

        let initial = service.currency().await.unwrap();
        assert_eq!(initial.currency, Currency::Usd);
        assert!(initial.updated_at.is_none());

        service.set_currency(Currency::Ngn).await.unwrap();
        let saved = SeaOrmSettingsService::new(store).currency().await.unwrap();
        assert_eq!(saved.currency, Currency::Ngn);
        assert!(saved.updated_at.is_some());
    }
}
