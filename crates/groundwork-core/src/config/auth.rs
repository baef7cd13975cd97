//! Authentication configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Shortest password length accepted anywhere in the system.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Longest accepted access token lifetime: one day.
pub const MAX_ACCESS_TTL_MINUTES: u64 = 24 * 60;

/// Longest accepted refresh token lifetime: one year.
pub const MAX_REFRESH_TTL_DAYS: u64 = 365;

/// Longest accepted password-reset token lifetime: one day.
pub const MAX_RESET_TTL_MINUTES: u64 = 24 * 60;

/// Authentication and credential configuration.
///
/// The signing secret is read once at startup and never mutated afterwards.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for token signing (HMAC-SHA256).
    pub jwt_secret: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: u64,
    /// Refresh token TTL in days.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_days: u64,
    /// Password-reset token TTL in minutes.
    #[serde(default = "default_reset_ttl")]
    pub reset_token_ttl_minutes: u64,
    /// Allowed clock skew when checking `exp`, in seconds.
    #[serde(default)]
    pub jwt_leeway_seconds: u64,
    /// Minimum password length for new passwords.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Name of the role that bypasses permission checks.
    #[serde(default = "default_superuser_role")]
    pub superuser_role: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"****")
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .field("refresh_ttl_days", &self.refresh_ttl_days)
            .field("reset_token_ttl_minutes", &self.reset_token_ttl_minutes)
            .field("jwt_leeway_seconds", &self.jwt_leeway_seconds)
            .field("password_min_length", &self.password_min_length)
            .field("superuser_role", &self.superuser_role)
            .finish()
    }
}

impl AuthConfig {
    /// Builds a configuration with defaults for everything except the secret.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: secret.into(),
            access_ttl_minutes: default_access_ttl(),
            refresh_ttl_days: default_refresh_ttl(),
            reset_token_ttl_minutes: default_reset_ttl(),
            jwt_leeway_seconds: 0,
            password_min_length: default_password_min(),
            superuser_role: default_superuser_role(),
        }
    }

    /// Validates the authentication section.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(AppError::configuration("auth.jwt_secret must be set"));
        }
        if self.access_ttl_minutes == 0 || self.refresh_ttl_days == 0 {
            return Err(AppError::configuration(
                "auth token TTLs must be greater than zero",
            ));
        }
        if self.reset_token_ttl_minutes == 0 {
            return Err(AppError::configuration(
                "auth.reset_token_ttl_minutes must be greater than zero",
            ));
        }
        if self.access_ttl_minutes > MAX_ACCESS_TTL_MINUTES {
            return Err(AppError::configuration(format!(
                "auth.access_ttl_minutes must not exceed {MAX_ACCESS_TTL_MINUTES}"
            )));
        }
        if self.refresh_ttl_days > MAX_REFRESH_TTL_DAYS {
            return Err(AppError::configuration(format!(
                "auth.refresh_ttl_days must not exceed {MAX_REFRESH_TTL_DAYS}"
            )));
        }
        if self.reset_token_ttl_minutes > MAX_RESET_TTL_MINUTES {
            return Err(AppError::configuration(format!(
                "auth.reset_token_ttl_minutes must not exceed {MAX_RESET_TTL_MINUTES}"
            )));
        }
        if self.password_min_length < MIN_PASSWORD_LENGTH {
            return Err(AppError::configuration(format!(
                "auth.password_min_length must be at least {MIN_PASSWORD_LENGTH}"
            )));
        }
        Ok(())
    }

    /// Access token lifetime, capped at [`MAX_ACCESS_TTL_MINUTES`].
    pub fn access_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.access_ttl_minutes.min(MAX_ACCESS_TTL_MINUTES) as i64)
    }

    /// Refresh token lifetime, capped at [`MAX_REFRESH_TTL_DAYS`].
    pub fn refresh_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(self.refresh_ttl_days.min(MAX_REFRESH_TTL_DAYS) as i64)
    }

    /// Password-reset token lifetime, capped at [`MAX_RESET_TTL_MINUTES`].
    pub fn reset_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.reset_token_ttl_minutes.min(MAX_RESET_TTL_MINUTES) as i64)
    }
}

fn default_access_ttl() -> u64 {
    15
}

fn default_refresh_ttl() -> u64 {
    7
}

fn default_reset_ttl() -> u64 {
    60
}

fn default_password_min() -> usize {
    MIN_PASSWORD_LENGTH
}

fn default_superuser_role() -> String {
    "Admin".to_string()
}
