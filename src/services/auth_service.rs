//! Domain service for authentication and user management.
//!
//! Handles signup, login, API keys, password changes and profile edits.
//! Resolving a credential yields a [`Viewer`]; everything downstream works
//! with that and never sees credentials.

use crate::domain::{Role, UserId, Viewer};
use crate::models::user::UserDto;
use serde::Serialize;
use thiserror::Error;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("User with this email already exists")]
    EmailTaken,

    #[error("Token invalid or expired")]
    InvalidResetToken,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(format!("{err:#}"))
    }
}

/// Signup form, already checked for presence of the required fields.
#[derive(Debug, Clone)]
pub struct Signup {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
}

/// Profile edit. Absent fields, and an empty name or email, keep the current
/// value; an empty phone clears it.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Login result containing the viewer identity and API key.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    #[serde(skip)]
    pub viewer: Viewer,
    pub email: String,
    pub role: Role,
    pub api_key: String,
    pub must_change_password: bool,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates a customer account with default preferences.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] for a short password and
    /// [`AuthError::EmailTaken`] when the email is already registered.
    async fn signup(&self, signup: Signup) -> Result<UserDto, AuthError>;

    /// Verifies credentials.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails.
    async fn login(&self, email: &str, password: &str) -> Result<LoginResult, AuthError>;

    /// Resolves an API key to the viewer it belongs to.
    async fn viewer_for_api_key(&self, api_key: &str) -> Result<Option<Viewer>, AuthError>;

    /// Re-reads a session's user so role changes apply immediately.
    async fn viewer_for_user(&self, user_id: &UserId) -> Result<Option<Viewer>, AuthError>;

    /// Gets information for a specific user.
    async fn get_user_info(&self, user_id: &UserId) -> Result<UserDto, AuthError>;

    /// Changes a user's password.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] if current password is incorrect or new password invalid.
    async fn change_password(
        &self,
        user_id: &UserId,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError>;

    /// Gets the current API key for a user.
    async fn get_api_key(&self, user_id: &UserId) -> Result<String, AuthError>;

    /// Regenerates the API key for a user and returns the new one.
    async fn regenerate_api_key(&self, user_id: &UserId) -> Result<String, AuthError>;

    /// # Errors
    ///
    /// Returns [`AuthError::EmailTaken`] when moving to another user's email.
    async fn update_profile(
        &self,
        user_id: &UserId,
        update: ProfileUpdate,
    ) -> Result<UserDto, AuthError>;

    /// All accounts, newest first.
    async fn list_users(&self) -> Result<Vec<UserDto>, AuthError>;

    /// Issues a single-use reset token for the account registered under
    /// `email` and hands the reset link to the mailer. Returns the token, or
    /// `None` when no such account exists; callers must not reveal which.
    async fn request_password_reset(&self, email: &str) -> Result<Option<String>, AuthError>;

    /// Sets a new password using a token from [`Self::request_password_reset`].
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidResetToken`] for unknown, used or expired
    /// tokens and [`AuthError::Validation`] for a short password.
    async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AuthError>;
}
