//! Refresh-token repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use uuid::Uuid;

use groundwork_core::error::{AppError, ErrorKind};
use groundwork_core::result::AppResult;
use groundwork_entity::token::RefreshToken;

/// Queries and updates on the `refresh_tokens` table.
///
/// Rows are append-only; the only mutation is the one-way `revoked_at` write.
#[derive(Debug, Clone, Copy, Default)]
pub struct RefreshTokenRepository;

impl RefreshTokenRepository {
    /// Persist the hash of a newly issued refresh token.
    pub async fn create(
        conn: &mut PgConnection,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<RefreshToken> {
        sqlx::query_as::<_, RefreshToken>(
            "INSERT INTO refresh_tokens (user_id, token_hash, expires_at) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(user_id)
        .bind(token_hash)
        .bind(expires_at)
        .fetch_one(conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to store refresh token", e)
        })
    }

    /// Tokens of a user that are neither revoked nor expired at `now`.
    pub async fn find_active_by_user(
        conn: &mut PgConnection,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<RefreshToken>> {
        sqlx::query_as::<_, RefreshToken>(
            "SELECT * FROM refresh_tokens \
             WHERE user_id = $1 AND revoked_at IS NULL AND expires_at > $2 \
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .bind(now)
        .fetch_all(conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load refresh tokens", e)
        })
    }

    /// Tokens of a user that have not been revoked, expired or not.
    pub async fn find_unrevoked_by_user(
        conn: &mut PgConnection,
        user_id: Uuid,
    ) -> AppResult<Vec<RefreshToken>> {
        sqlx::query_as::<_, RefreshToken>(
            "SELECT * FROM refresh_tokens \
             WHERE user_id = $1 AND revoked_at IS NULL \
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load refresh tokens", e)
        })
    }

    /// Revoke one token. Returns `false` if it was already revoked.
    pub async fn revoke(conn: &mut PgConnection, id: Uuid, at: DateTime<Utc>) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = $2 WHERE id = $1 AND revoked_at IS NULL",
        )
        .bind(id)
        .bind(at)
        .execute(conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to revoke refresh token", e)
        })?;

        Ok(result.rows_affected() == 1)
    }

    /// Revoke every unrevoked token of a user. Returns the number revoked.
    pub async fn revoke_all_for_user(
        conn: &mut PgConnection,
        user_id: Uuid,
        at: DateTime<Utc>,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = $2 WHERE user_id = $1 AND revoked_at IS NULL",
        )
        .bind(user_id)
        .bind(at)
        .execute(conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to revoke refresh tokens", e)
        })?;

        Ok(result.rows_affected())
    }
}
