pub mod prelude;

pub mod cars;
pub mod favorite_cars;
pub mod inquiries;
pub mod password_reset_tokens;
pub mod settings;
pub mod user_preferences;
pub mod users;
