/// Seeded administrator account, created by the first migration run.
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@carlot.local";

pub const DEFAULT_ADMIN_NAME: &str = "Administrator";

/// Default API key for the seeded admin (regenerate after first login)
pub const DEFAULT_API_KEY: &str = "carlot_default_api_key_please_regenerate";

pub mod limits {

    pub const FEATURED_CARS: u64 = 6;

    pub const SIMILAR_CARS_DEFAULT: u64 = 6;

    pub const SIMILAR_CARS_MAX: u64 = 50;

    pub const RECENT_INQUIRIES: u64 = 5;

    pub const MIN_SIGNUP_PASSWORD_LEN: usize = 6;

    pub const MIN_CHANGED_PASSWORD_LEN: usize = 8;
}

pub mod preferences {

    pub const DEFAULT_MAX_PRICE: i64 = 50_000;
}
