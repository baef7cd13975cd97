//! Persisted bearer-credential rows.
//!
//! Neither table ever stores a bearer secret in recoverable form: refresh
//! tokens keep an Argon2 hash of the whole token, reset tokens keep the
//! selector in clear and an Argon2 hash of the validator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Server-side record of an issued refresh token.
///
/// Append-only except for the single `revoked_at` write.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RefreshToken {
    /// Unique row identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Argon2 hash of the refresh token string.
    #[serde(skip_serializing)]
    pub token_hash: String,
    /// Expiry instant.
    pub expires_at: DateTime<Utc>,
    /// Revocation instant, if revoked.
    pub revoked_at: Option<DateTime<Utc>>,
    /// Issuance instant.
    pub created_at: DateTime<Utc>,
}

impl RefreshToken {
    /// Returns `true` if the token has been explicitly revoked.
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// Returns `true` if the token is neither revoked nor expired at `now`.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_revoked() && self.expires_at > now
    }
}

/// Server-side record of a password-reset request.
///
/// Once `used_at` is set the row is permanently inert.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PasswordResetToken {
    /// Unique row identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Non-secret lookup key, unique across all rows.
    pub token_selector: String,
    /// Argon2 hash of the validator half.
    #[serde(skip_serializing)]
    pub token_hash: String,
    /// Expiry instant.
    pub expires_at: DateTime<Utc>,
    /// Consumption instant, if consumed.
    pub used_at: Option<DateTime<Utc>>,
    /// Issuance instant.
    pub created_at: DateTime<Utc>,
}

impl PasswordResetToken {
    /// Returns `true` if the token can still be consumed at `now`.
    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        self.used_at.is_none() && self.expires_at > now
    }
}
