use serde::Serialize;

use crate::domain::{Role, UserId, Viewer};
use crate::entities::users;
use crate::inventory::shape::normalize_timestamp;

/// User data returned from the store (without the password hash)
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub role: Role,
    pub provider: Option<String>,
    pub api_key: String,
    pub must_change_password: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            name: model.name,
            phone: model.phone,
            role: model.role,
            provider: model.provider,
            api_key: model.api_key,
            must_change_password: model.must_change_password,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl User {
    #[must_use]
    pub fn viewer(&self) -> Viewer {
        Viewer {
            user_id: UserId::from(self.id.as_str()),
            role: self.role,
        }
    }
}

/// A user account as clients see it. Never carries credentials.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: String,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub role: Role,
    pub provider: Option<String>,
    pub must_change_password: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            created_at: normalize_timestamp(&user.created_at),
            updated_at: normalize_timestamp(&user.updated_at),
            id: user.id,
            email: user.email,
            name: user.name,
            phone: user.phone,
            role: user.role,
            provider: user.provider,
            must_change_password: user.must_change_password,
        }
    }
}
