pub mod car;
pub mod favorite;
pub mod inquiry;
pub mod password_reset;
pub mod preferences;
pub mod settings;
pub mod user;
