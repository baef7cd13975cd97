//! Claim set carried by access and refresh tokens.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::random;

/// Random bytes in every token ID.
const TOKEN_ID_BYTES: usize = 16;

/// Signed claim set embedded in every access and refresh token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject, the user ID.
    pub sub: Uuid,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Random token ID. Keeps two tokens minted in the same second distinct.
    pub jti: String,
    /// Which kind of token this claim set belongs to.
    #[serde(rename = "type")]
    pub token_type: TokenType,
}

/// Distinguishes access tokens from refresh tokens.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Short-lived token authorizing individual requests.
    Access,
    /// Long-lived token exchanged for new access tokens.
    Refresh,
}

impl Claims {
    /// Builds a claim set issued at `issued_at` and valid for `ttl`.
    pub fn new(user_id: Uuid, token_type: TokenType, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            sub: user_id,
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
            jti: random::url_safe_token(TOKEN_ID_BYTES),
            token_type,
        }
    }

    /// Returns the user ID from the subject claim.
    pub fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}
