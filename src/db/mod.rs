use crate::config::SecurityConfig;
use crate::domain::{InquiryStatus, Role};
use crate::entities::{cars, inquiries, settings};
use crate::models::car::{CarChanges, NewCar};
use crate::models::inquiry::NewInquiry;
use crate::models::preferences::Preferences;
use crate::models::user::User;
use anyhow::Result;
use sea_orm::sea_query::{Order, SimpleExpr};
use sea_orm::{
    Condition, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement,
};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::user::{NewUser, ProfileChanges};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        // Every connection to an in-memory database sees its own database,
        // so the pool is pinned to a single connection.
        let in_memory = db_url.contains(":memory:");
        let (max_connections, min_connections) = if in_memory {
            (1, 1)
        } else {
            (max_connections, min_connections)
        };

        if !in_memory {
            let path_str = db_url
                .trim_start_matches("sqlite://")
                .trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false);
        if !in_memory {
            opt.idle_timeout(Duration::from_secs(300))
                .max_lifetime(Duration::from_secs(600));
        }

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn car_repo(&self) -> repositories::car::CarRepository {
        repositories::car::CarRepository::new(self.conn.clone())
    }

    fn inquiry_repo(&self) -> repositories::inquiry::InquiryRepository {
        repositories::inquiry::InquiryRepository::new(self.conn.clone())
    }

    fn favorite_repo(&self) -> repositories::favorite::FavoriteRepository {
        repositories::favorite::FavoriteRepository::new(self.conn.clone())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn password_reset_repo(&self) -> repositories::password_reset::PasswordResetRepository {
        repositories::password_reset::PasswordResetRepository::new(self.conn.clone())
    }

    fn settings_repo(&self) -> repositories::settings::SettingsRepository {
        repositories::settings::SettingsRepository::new(self.conn.clone())
    }

    fn preferences_repo(&self) -> repositories::preferences::PreferencesRepository {
        repositories::preferences::PreferencesRepository::new(self.conn.clone())
    }

    pub async fn search_cars(
        &self,
        condition: Condition,
        order: Vec<(SimpleExpr, Order)>,
        limit: Option<u64>,
    ) -> Result<Vec<cars::Model>> {
        self.car_repo().search(condition, order, limit).await
    }

    pub async fn get_car(&self, id: &str) -> Result<Option<cars::Model>> {
        self.car_repo().get(id).await
    }

    pub async fn add_car(&self, car: NewCar) -> Result<cars::Model> {
        self.car_repo().insert(car).await
    }

    pub async fn update_car(&self, id: &str, changes: CarChanges) -> Result<Option<cars::Model>> {
        self.car_repo().update(id, changes).await
    }

    pub async fn remove_car(&self, id: &str) -> Result<bool> {
        self.car_repo().delete(id).await
    }

    pub async fn increment_car_views(&self, id: &str) -> Result<Option<i64>> {
        self.car_repo().increment_views(id).await
    }

    pub async fn get_car_view_count(&self, id: &str) -> Result<Option<i64>> {
        self.car_repo().view_count(id).await
    }

    pub async fn count_cars(&self, available_only: bool) -> Result<u64> {
        self.car_repo().count(available_only).await
    }

    pub async fn add_inquiry(&self, inquiry: NewInquiry) -> Result<inquiries::Model> {
        self.inquiry_repo().insert(inquiry).await
    }

    pub async fn list_inquiries(
        &self,
        user_id: Option<&str>,
        limit: Option<u64>,
    ) -> Result<Vec<(inquiries::Model, Option<cars::Model>)>> {
        self.inquiry_repo().list(user_id, limit).await
    }

    pub async fn set_inquiry_status(&self, id: &str, status: InquiryStatus) -> Result<bool> {
        self.inquiry_repo().set_status(id, status).await
    }

    pub async fn count_inquiries(&self, status: Option<InquiryStatus>) -> Result<u64> {
        self.inquiry_repo().count(status).await
    }

    pub async fn is_favorite(&self, user_id: &str, car_id: &str) -> Result<bool> {
        self.favorite_repo().exists(user_id, car_id).await
    }

    pub async fn toggle_favorite(&self, user_id: &str, car_id: &str) -> Result<bool> {
        self.favorite_repo().toggle(user_id, car_id).await
    }

    pub async fn list_favorite_cars(&self, user_id: &str) -> Result<Vec<cars::Model>> {
        self.favorite_repo().list_cars(user_id).await
    }

    pub async fn get_preferences(&self, user_id: &str) -> Result<Option<Preferences>> {
        self.preferences_repo().get(user_id).await
    }

    pub async fn save_preferences(&self, user_id: &str, preferences: &Preferences) -> Result<()> {
        self.preferences_repo().upsert(user_id, preferences).await
    }

    pub async fn create_user(&self, user: NewUser, security: &SecurityConfig) -> Result<User> {
        self.user_repo().create(user, security).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn verify_user_password(&self, email: &str, password: &str) -> Result<Option<User>> {
        self.user_repo().verify_password(email, password).await
    }

    pub async fn verify_user_password_by_id(&self, id: &str, password: &str) -> Result<bool> {
        self.user_repo().verify_password_by_id(id, password).await
    }

    pub async fn update_user_password(
        &self,
        id: &str,
        new_password: &str,
        security: &SecurityConfig,
    ) -> Result<()> {
        self.user_repo()
            .update_password(id, new_password, security)
            .await
    }

    pub async fn verify_api_key(&self, api_key: &str) -> Result<Option<User>> {
        self.user_repo().verify_api_key(api_key).await
    }

    pub async fn regenerate_user_api_key(&self, id: &str) -> Result<String> {
        self.user_repo().regenerate_api_key(id).await
    }

    pub async fn update_user_profile(
        &self,
        id: &str,
        changes: ProfileChanges,
    ) -> Result<Option<User>> {
        self.user_repo().update_profile(id, changes).await
    }

    pub async fn set_user_role(&self, email: &str, role: Role) -> Result<bool> {
        self.user_repo().set_role(email, role).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.user_repo().list().await
    }

    pub async fn count_users(&self, role: Role) -> Result<u64> {
        self.user_repo().count_by_role(role).await
    }

    pub async fn create_password_reset(
        &self,
        user_id: &str,
        secret: &str,
        ttl: chrono::Duration,
        security: &SecurityConfig,
    ) -> Result<String> {
        self.password_reset_repo()
            .create(user_id, secret, ttl, security)
            .await
    }

    pub async fn redeem_password_reset(&self, id: &str, secret: &str) -> Result<Option<String>> {
        self.password_reset_repo().redeem(id, secret).await
    }

    pub async fn get_setting(&self, key: &str) -> Result<Option<settings::Model>> {
        self.settings_repo().get(key).await
    }

    pub async fn set_setting(&self, key: &str, value: &str) -> Result<settings::Model> {
        self.settings_repo().set(key, value).await
    }
}
