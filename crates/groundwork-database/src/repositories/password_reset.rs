//! Password-reset token repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use uuid::Uuid;

use groundwork_core::error::{AppError, ErrorKind};
use groundwork_core::result::AppResult;
use groundwork_entity::token::PasswordResetToken;

/// Queries and updates on the `password_reset_tokens` table.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordResetTokenRepository;

impl PasswordResetTokenRepository {
    /// Persist a reset request: selector in clear, validator hashed.
    ///
    /// Returns `None` when the selector is already taken. The insert uses
    /// `ON CONFLICT DO NOTHING`, so the caller's transaction stays usable
    /// for another attempt.
    pub async fn create(
        conn: &mut PgConnection,
        user_id: Uuid,
        selector: &str,
        validator_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<Option<PasswordResetToken>> {
        sqlx::query_as::<_, PasswordResetToken>(
            "INSERT INTO password_reset_tokens (user_id, token_selector, token_hash, expires_at) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT ON CONSTRAINT uq_password_reset_tokens_selector DO NOTHING \
             RETURNING *",
        )
        .bind(user_id)
        .bind(selector)
        .bind(validator_hash)
        .bind(expires_at)
        .fetch_optional(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to store reset token", e))
    }

    /// Find the unused, unexpired row for `selector` and lock it.
    ///
    /// A concurrent confirm for the same selector blocks here until the first
    /// transaction ends, then re-checks `used_at` and finds nothing.
    pub async fn find_usable_for_update(
        conn: &mut PgConnection,
        selector: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<PasswordResetToken>> {
        sqlx::query_as::<_, PasswordResetToken>(
            "SELECT * FROM password_reset_tokens \
             WHERE token_selector = $1 AND used_at IS NULL AND expires_at > $2 \
             FOR UPDATE",
        )
        .bind(selector)
        .bind(now)
        .fetch_optional(conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find reset token", e)
        })
    }

    /// Find a row by selector regardless of state.
    pub async fn find_by_selector(
        conn: &mut PgConnection,
        selector: &str,
    ) -> AppResult<Option<PasswordResetToken>> {
        sqlx::query_as::<_, PasswordResetToken>(
            "SELECT * FROM password_reset_tokens WHERE token_selector = $1",
        )
        .bind(selector)
        .fetch_optional(conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find reset token", e)
        })
    }

    /// Consume a row. Returns `false` if it had already been consumed.
    pub async fn mark_used(conn: &mut PgConnection, id: Uuid, at: DateTime<Utc>) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE password_reset_tokens SET used_at = $2 WHERE id = $1 AND used_at IS NULL",
        )
        .bind(id)
        .bind(at)
        .execute(conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to consume reset token", e)
        })?;

        Ok(result.rows_affected() == 1)
    }
}
