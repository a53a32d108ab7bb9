use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, patch, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::Config;
use crate::state::SharedState;

mod admin;
pub mod auth;
mod cars;
mod error;
mod favorites;
mod inquiries;
mod observability;
mod system;
mod types;
mod users;
mod validation;

pub use error::ApiError;
pub use types::*;

use tokio::sync::RwLock;

use crate::services::{
    AuthService, CustomerService, InquiryService, InventoryService, SettingsService,
};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn inventory_service(&self) -> &Arc<dyn InventoryService> {
        &self.shared.inventory_service
    }

    #[must_use]
    pub fn auth_service(&self) -> &Arc<dyn AuthService> {
        &self.shared.auth_service
    }

    #[must_use]
    pub fn inquiry_service(&self) -> &Arc<dyn InquiryService> {
        &self.shared.inquiry_service
    }

    #[must_use]
    pub fn customer_service(&self) -> &Arc<dyn CustomerService> {
        &self.shared.customer_service
    }

    #[must_use]
    pub fn settings_service(&self) -> &Arc<dyn SettingsService> {
        &self.shared.settings_service
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub async fn router(state: Arc<AppState>) -> Router {
    let (cors_origins, secure_cookies, session_minutes) = {
        let config = state.config().read().await;
        (
            config.server.cors_allowed_origins.clone(),
            config.server.secure_cookies,
            config.server.session_minutes,
        )
    };

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            session_minutes,
        )));

    let api_router = Router::new()
        .merge(create_public_router())
        .merge(create_user_router())
        .merge(create_admin_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::resolve_viewer,
        ))
        .layer(session_layer)
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::track_metrics))
}

fn create_public_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(system::health))
        .route("/cars", get(cars::list_cars))
        .route("/cars/similar", get(cars::similar_cars))
        .route("/cars/featured", get(cars::featured_cars))
        .route("/cars/{id}", get(cars::get_car))
        .route(
            "/cars/{id}/view",
            get(cars::get_view_count).post(cars::record_view),
        )
        .route("/cars/{id}/image", get(cars::car_image))
        .route("/contact", post(inquiries::submit))
        .route(
            "/user/favorites/{car_id}",
            get(favorites::favorite_status).post(favorites::toggle_favorite),
        )
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/request-reset", post(auth::request_reset))
        .route("/auth/reset-password", post(auth::reset_password))
}

fn create_user_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/me", get(auth::get_current_user))
        .route("/auth/password", put(auth::change_password))
        .route("/auth/api-key", get(auth::get_api_key))
        .route("/auth/api-key/regenerate", post(auth::regenerate_api_key))
        .route("/user/favorites", get(favorites::list_favorites))
        .route(
            "/user/preferences",
            get(users::get_preferences).put(users::update_preferences),
        )
        .route("/user/profile", put(users::update_profile))
        .route("/user/inquiries", get(inquiries::list_own))
        .route_layer(middleware::from_fn(auth::require_viewer))
}

fn create_admin_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/admin/cars",
            get(admin::list_cars).post(admin::create_car),
        )
        .route(
            "/admin/cars/{id}",
            get(admin::get_car)
                .put(admin::update_car)
                .delete(admin::delete_car),
        )
        .route("/admin/stats", get(admin::get_stats))
        .route(
            "/admin/currency",
            get(admin::get_currency).post(admin::set_currency),
        )
        .route("/admin/users", get(admin::list_users))
        .route("/admin/inquiries", get(admin::list_inquiries))
        .route("/admin/inquiries/{id}", patch(admin::update_inquiry))
        .route("/metrics", get(observability::get_metrics))
        .route_layer(middleware::from_fn(auth::require_admin))
}
