use anyhow::{Context, Result};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordVerifier},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    sea_query::Expr,
};
use tokio::task;
use tracing::info;

use super::user::hash_password;
use crate::config::SecurityConfig;
use crate::domain::{format_timestamp, timestamp_now};
use crate::entities::{password_reset_tokens, prelude::*};

pub struct PasswordResetRepository {
    conn: DatabaseConnection,
}

impl PasswordResetRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Stores the hash of `secret` for `user_id`, valid for `ttl`. Returns
    /// the record id, which callers pair with the secret to form the token.
    pub async fn create(
        &self,
        user_id: &str,
        secret: &str,
        ttl: chrono::Duration,
        security: &SecurityConfig,
    ) -> Result<String> {
        let secret = secret.to_string();
        let security = security.clone();
        let token_hash = task::spawn_blocking(move || hash_password(&secret, Some(&security)))
            .await
            .context("Token hashing task panicked")??;

        let now = chrono::Utc::now();
        let active_model = password_reset_tokens::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            user_id: Set(user_id.to_string()),
            token_hash: Set(token_hash),
            expires_at: Set(format_timestamp(now + ttl)),
            used: Set(false),
            created_at: Set(format_timestamp(now)),
        };

        let model = active_model
            .insert(&self.conn)
            .await
            .context("Failed to insert password reset token")?;

        info!(user_id = %user_id, expires_at = %model.expires_at, "Issued password reset token");
        Ok(model.id)
    }

    /// Consumes the token `id` when `secret` matches, it is unused and it has
    /// not expired. Returns the owning user id.
    pub async fn redeem(&self, id: &str, secret: &str) -> Result<Option<String>> {
        let now = timestamp_now();
        let Some(record) = PasswordResetTokens::find_by_id(id)
            .filter(password_reset_tokens::Column::Used.eq(false))
            .filter(password_reset_tokens::Column::ExpiresAt.gt(now))
            .one(&self.conn)
            .await
            .context("Failed to query password reset token")?
        else {
            return Ok(None);
        };

        let token_hash = record.token_hash.clone();
        let secret = secret.to_string();
        let matches = task::spawn_blocking(move || {
            let parsed = PasswordHash::new(&token_hash)
                .map_err(|e| anyhow::anyhow!("Invalid token hash format: {e}"))?;

            Ok::<bool, anyhow::Error>(
                Argon2::default()
                    .verify_password(secret.as_bytes(), &parsed)
                    .is_ok(),
            )
        })
        .await
        .context("Token verification task panicked")??;

        if !matches {
            return Ok(None);
        }

        // Only one concurrent redemption flips `used`.
        let result = PasswordResetTokens::update_many()
            .col_expr(password_reset_tokens::Column::Used, Expr::value(true))
            .filter(password_reset_tokens::Column::Id.eq(id))
            .filter(password_reset_tokens::Column::Used.eq(false))
            .exec(&self.conn)
            .await
            .context("Failed to mark password reset token used")?;

        Ok((result.rows_affected == 1).then_some(record.user_id))
    }
}
