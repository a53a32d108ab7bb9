pub mod car;
pub mod inquiry;
pub mod preferences;
pub mod user;
