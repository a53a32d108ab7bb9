//! `SeaORM` implementation of the `AuthService` trait.

use crate::config::{Config, SecurityConfig};
use crate::constants::limits::{MIN_CHANGED_PASSWORD_LEN, MIN_SIGNUP_PASSWORD_LEN};
use crate::db::repositories::user::generate_api_key;
use crate::db::{NewUser, ProfileChanges, Store};
use crate::domain::{Role, UserId, Viewer};
use crate::models::preferences::Preferences;
use crate::models::user::UserDto;
use crate::services::auth_service::{
    AuthError, AuthService, LoginResult, ProfileUpdate, Signup,
};
use async_trait::async_trait;
use sea_orm::{DbErr, SqlErr};
use tracing::{debug, info};

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
    public_url: String,
}

impl SeaOrmAuthService {
    #[must_use]
    pub fn new(store: Store, config: &Config) -> Self {
        Self {
            store,
            security: config.security.clone(),
            public_url: config.server.public_url.trim_end_matches('/').to_string(),
        }
    }
}

/// Reset tokens are `<record id>.<secret>`; only the secret's hash is stored.
fn split_reset_token(token: &str) -> Option<(&str, &str)> {
    token
        .trim()
        .split_once('.')
        .filter(|(id, secret)| !id.is_empty() && !secret.is_empty())
}

/// A unique-index violation while writing a user means the email is taken;
/// the pre-checks can race with a concurrent write.
fn email_conflict(err: anyhow::Error) -> AuthError {
    match err.downcast_ref::<DbErr>().and_then(DbErr::sql_err) {
        Some(SqlErr::UniqueConstraintViolation(_)) => AuthError::EmailTaken,
        _ => AuthError::from(err),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn signup(&self, signup: Signup) -> Result<UserDto, AuthError> {
        if signup.password.chars().count() < MIN_SIGNUP_PASSWORD_LEN {
            return Err(AuthError::Validation(format!(
                "Password must be at least {MIN_SIGNUP_PASSWORD_LEN} characters long"
            )));
        }

        let email = signup.email.trim().to_lowercase();
        if self.store.get_user_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let user = self
            .store
            .create_user(
                NewUser {
                    email,
                    name: signup.name.trim().to_string(),
                    phone: non_empty(signup.phone),
                    password: Some(signup.password),
                    role: Role::Customer,
                },
                &self.security,
            )
            .await
            .map_err(email_conflict)?;

        self.store
            .save_preferences(&user.id, &Preferences::default())
            .await?;

        info!(user_id = %user.id, "Customer signed up");
        Ok(UserDto::from(user))
    }

    async fn login(&self, email: &str, password: &str) -> Result<LoginResult, AuthError> {
        let user = self
            .store
            .verify_user_password(&email.trim().to_lowercase(), password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        Ok(LoginResult {
            viewer: user.viewer(),
            email: user.email,
            role: user.role,
            api_key: user.api_key,
            must_change_password: user.must_change_password,
        })
    }

    async fn viewer_for_api_key(&self, api_key: &str) -> Result<Option<Viewer>, AuthError> {
        let user = self.store.verify_api_key(api_key).await?;
        Ok(user.map(|u| u.viewer()))
    }

    async fn viewer_for_user(&self, user_id: &UserId) -> Result<Option<Viewer>, AuthError> {
        let user = self.store.get_user_by_id(user_id.as_str()).await?;
        Ok(user.map(|u| u.viewer()))
    }

    async fn get_user_info(&self, user_id: &UserId) -> Result<UserDto, AuthError> {
        let user = self
            .store
            .get_user_by_id(user_id.as_str())
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(UserDto::from(user))
    }

    async fn change_password(
        &self,
        user_id: &UserId,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        // Validate new password
        if new_password.chars().count() < MIN_CHANGED_PASSWORD_LEN {
            return Err(AuthError::Validation(format!(
                "New password must be at least {MIN_CHANGED_PASSWORD_LEN} characters"
            )));
        }

        if current_password == new_password {
            return Err(AuthError::Validation(
                "New password must be different from current password".to_string(),
            ));
        }

        // Verify current password
        let is_valid = self
            .store
            .verify_user_password_by_id(user_id.as_str(), current_password)
            .await?;

        if !is_valid {
            return Err(AuthError::Validation(
                "Current password is incorrect".to_string(),
            ));
        }

        self.store
            .update_user_password(user_id.as_str(), new_password, &self.security)
            .await?;

        Ok(())
    }

    async fn get_api_key(&self, user_id: &UserId) -> Result<String, AuthError> {
        let user = self
            .store
            .get_user_by_id(user_id.as_str())
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(user.api_key)
    }

    async fn regenerate_api_key(&self, user_id: &UserId) -> Result<String, AuthError> {
        let new_api_key = self
            .store
            .regenerate_user_api_key(user_id.as_str())
            .await?;

        Ok(new_api_key)
    }

    async fn update_profile(
        &self,
        user_id: &UserId,
        update: ProfileUpdate,
    ) -> Result<UserDto, AuthError> {
        let email = non_empty(update.email).map(|e| e.to_lowercase());
        if let Some(email) = &email
            && let Some(owner) = self.store.get_user_by_email(email).await?
            && owner.id != user_id.as_str()
        {
            return Err(AuthError::EmailTaken);
        }

        let changes = ProfileChanges {
            name: non_empty(update.name),
            email,
            phone: update.phone.map(|phone| non_empty(Some(phone))),
        };

        let user = self
            .store
            .update_user_profile(user_id.as_str(), changes)
            .await
            .map_err(email_conflict)?
            .ok_or(AuthError::UserNotFound)?;

        Ok(UserDto::from(user))
    }

    async fn list_users(&self) -> Result<Vec<UserDto>, AuthError> {
        let users = self.store.list_users().await?;
        Ok(users.into_iter().map(UserDto::from).collect())
    }

    async fn request_password_reset(&self, email: &str) -> Result<Option<String>, AuthError> {
        let Some(user) = self
            .store
            .get_user_by_email(&email.trim().to_lowercase())
            .await?
        else {
            debug!("Password reset requested for unknown email");
            return Ok(None);
        };

        let secret = generate_api_key();
        let id = self
            .store
            .create_password_reset(
                &user.id,
                &secret,
                chrono::Duration::minutes(self.security.password_reset_minutes),
                &self.security,
            )
            .await?;
        let token = format!("{id}.{secret}");

        // Mail delivery is external; the link goes out through the log pipeline.
        let reset_url = format!("{}/reset-password?token={token}", self.public_url);
        info!(email = %user.email, reset_url = %reset_url, "Password reset link issued");

        Ok(Some(token))
    }

    async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AuthError> {
        if new_password.chars().count() < MIN_SIGNUP_PASSWORD_LEN {
            return Err(AuthError::Validation(format!(
                "Password must be at least {MIN_SIGNUP_PASSWORD_LEN} characters long"
            )));
        }

        let (id, secret) = split_reset_token(token).ok_or(AuthError::InvalidResetToken)?;
        let user_id = self
            .store
            .redeem_password_reset(id, secret)
            .await?
            .ok_or(AuthError::InvalidResetToken)?;

        self.store
            .update_user_password(&user_id, new_password, &self.security)
            .await?;

        info!(user_id = %user_id, "Password reset completed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn service() -> (Store, SeaOrmAuthService) {
        let store = Store::new("sqlite::memory:").await.unwrap();
        let service = SeaOrmAuthService::new(store.clone(), &Config::default());
        (store, service)
    }

    fn signup(email: &str) -> Signup {
        Signup {
            name: "Jane Doe".to_string(),
            email: email.to_string(),
            password: "secret123".to_string(),
            phone: None,
        }
    }

    #[tokio::test]
    async fn unique_violation_maps_to_email_taken() {
        let (store, _) = service().await;
        let new_user = NewUser {
            email: "jane@example.com".to_string(),
            name: "Jane".to_string(),
            phone: None,
            password: None,
            role: Role::Customer,
        };
        store
            .create_user(new_user.clone(), &SecurityConfig::default())
            .await
            .unwrap();

        let err = store
            .create_user(new_user, &SecurityConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(email_conflict(err), AuthError::EmailTaken));

        let other = email_conflict(anyhow::anyhow!("disk on fire"));
        assert!(matches!(other, AuthError::Internal(_)));
    }

    #[tokio::test]
    async fn concurrent_signups_for_one_email_yield_one_account() {
        let (store, service) = service().await;

        let (first, second) = tokio::join!(
            service.signup(signup("race@example.com")),
            service.signup(signup("Race@Example.com")),
        );

        let outcomes = [first, second];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(
            outcomes
                .iter()
                .any(|r| matches!(r, Err(AuthError::EmailTaken)))
        );
        assert_eq!(store.count_users(Role::Customer).await.unwrap(), 1);
    }

    #[test]
    fn reset_tokens_need_both_halves() {
        assert_eq!(split_reset_token(" abc.def "), Some(("abc", "def")));
        assert_eq!(split_reset_token("abcdef"), None);
        assert_eq!(split_reset_token(".def"), None);
        assert_eq!(split_reset_token("abc."), None);
    }

    #[tokio::test]
    async fn profile_email_conflict_is_reported() {
        let (_, service) = service().await;
        let jane = service.signup(signup("jane@example.com")).await.unwrap();
        service.signup(signup("john@example.com")).await.unwrap();

        let result = service
            .update_profile(
                &UserId::from(jane.id.as_str()),
                ProfileUpdate {
                    email: Some("john@example.com".to_string()),
                    ..ProfileUpdate::default()
                },
            )
            .await;
        assert!(matches!(result, Err(AuthError::EmailTaken)));
    }
}
