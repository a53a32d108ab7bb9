pub mod image;
pub use image::{ImageService, ImageSize};

pub mod inventory_service;
pub mod inventory_service_impl;
pub use inventory_service::{InventoryError, InventoryService};
pub use inventory_service_impl::SeaOrmInventoryService;

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, LoginResult, ProfileUpdate, Signup};
pub use auth_service_impl::SeaOrmAuthService;

pub mod inquiry_service;
pub mod inquiry_service_impl;
pub use inquiry_service::{InquiryError, InquiryService};
pub use inquiry_service_impl::SeaOrmInquiryService;

pub mod customer_service;
pub mod customer_service_impl;
pub use customer_service::{CustomerError, CustomerService};
pub use customer_service_impl::SeaOrmCustomerService;

pub mod settings_service;
pub mod settings_service_impl;
pub use settings_service::{CurrencySetting, SettingsError, SettingsService};
pub use settings_service_impl::SeaOrmSettingsService;
