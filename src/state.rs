use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::inventory::SimilarLimits;
use crate::services::{
    AuthService, CustomerService, InquiryService, InventoryService, SeaOrmAuthService,
    SeaOrmCustomerService, SeaOrmInquiryService, SeaOrmInventoryService, SeaOrmSettingsService,
    SettingsService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub inventory_service: Arc<dyn InventoryService>,

    pub auth_service: Arc<dyn AuthService>,

    pub inquiry_service: Arc<dyn InquiryService>,

    pub customer_service: Arc<dyn CustomerService>,

    pub settings_service: Arc<dyn SettingsService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Ok(Self::with_store(config, store))
    }

    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let inventory_service = Arc::new(SeaOrmInventoryService::new(store.clone(), &config))
            as Arc<dyn InventoryService + Send + Sync + 'static>;

        let auth_service = Arc::new(SeaOrmAuthService::new(store.clone(), &config))
            as Arc<dyn AuthService + Send + Sync + 'static>;

        let inquiry_service = Arc::new(SeaOrmInquiryService::new(store.clone()))
            as Arc<dyn InquiryService + Send + Sync + 'static>;

        let customer_service = Arc::new(SeaOrmCustomerService::new(store.clone()))
            as Arc<dyn CustomerService + Send + Sync + 'static>;

        let settings_service = Arc::new(SeaOrmSettingsService::new(store.clone()))
            as Arc<dyn SettingsService + Send + Sync + 'static>;

        Self {
            config: Arc::new(RwLock::new(config)),
            store,
            inventory_service,
            auth_service,
            inquiry_service,
            customer_service,
            settings_service,
        }
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }

    pub async fn similar_limits(&self) -> SimilarLimits {
        let config = self.config.read().await;
        SimilarLimits {
            default: config.inventory.similar_default_limit,
            max: config.inventory.similar_max_limit,
        }
    }
}
