//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use groundwork_core::error::AppError;

/// Runs the derived validation rules, mapping failures to `Validation`.
pub fn validated<T: Validate>(req: T) -> Result<T, AppError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    Ok(req)
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// E-mail address.
    #[validate(email(message = "A valid e-mail address is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Body of refresh and logout requests.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RefreshRequest {
    /// Refresh token.
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Password-reset request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PasswordResetRequest {
    /// Account e-mail.
    #[validate(email(message = "A valid e-mail address is required"))]
    pub email: String,
}

/// Password-reset confirmation; the token travels in the path.
///
/// Only presence is checked here. Length rules come from the configured
/// password policy in the auth core.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PasswordResetConfirmRequest {
    /// New password.
    #[validate(length(min = 1, message = "New password is required"))]
    pub new_password: String,
}

/// Create issue request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateIssueRequest {
    /// Issue title.
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    /// Optional long description.
    pub description: Option<String>,
    /// Optional assignee.
    pub assignee_id: Option<Uuid>,
}
