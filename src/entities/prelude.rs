pub use super::cars::Entity as Cars;
pub use super::favorite_cars::Entity as FavoriteCars;
pub use super::inquiries::Entity as Inquiries;
pub use super::password_reset_tokens::Entity as PasswordResetTokens;
pub use super::settings::Entity as Settings;
pub use super::user_preferences::Entity as UserPreferences;
pub use super::users::Entity as Users;
