//! Auth handlers: login, logout, refresh, me and password reset.

use axum::Json;
use axum::extract::{Path, State};

use crate::dto::request::{
    LoginRequest, PasswordResetConfirmRequest, PasswordResetRequest, RefreshRequest, validated,
};
use crate::dto::response::{
    ApiResponse, LoginResponse, MessageResponse, RefreshResponse, UserResponse,
};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// Reported for every password-reset request, whether or not the account exists.
pub const RESET_REQUESTED_MESSAGE: &str =
    "If an account exists for that address, a password reset link has been sent";

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<ApiResponse<LoginResponse>>> {
    let req = validated(req)?;
    let result = state.session_manager.login(&req.email, &req.password).await?;

    Ok(Json(ApiResponse::ok(LoginResponse {
        access_token: result.tokens.access_token,
        refresh_token: result.tokens.refresh_token,
        access_expires_at: result.tokens.access_expires_at,
        refresh_expires_at: result.tokens.refresh_expires_at,
        csrf_token: result.csrf_token,
        user: UserResponse::new(&result.user, None),
    })))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    let req = validated(req)?;
    state.session_manager.logout(&req.refresh_token).await?;

    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Logged out successfully",
    ))))
}

/// POST /api/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<ApiResponse<RefreshResponse>>> {
    let req = validated(req)?;
    let result = state.session_manager.refresh(&req.refresh_token).await?;

    Ok(Json(ApiResponse::ok(RefreshResponse {
        access_token: result.access_token,
        access_expires_at: result.access_expires_at,
        csrf_token: result.csrf_token,
    })))
}

/// GET /api/auth/me
pub async fn me(auth: AuthUser) -> Json<ApiResponse<UserResponse>> {
    Json(ApiResponse::ok(UserResponse::new(
        &auth.user,
        auth.role.as_ref(),
    )))
}

/// POST /api/auth/password-reset
///
/// Token delivery is left to an outside mailer; the response never reveals
/// whether the address matched an account.
pub async fn request_password_reset(
    State(state): State<AppState>,
    Json(req): Json<PasswordResetRequest>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    let req = validated(req)?;
    if state
        .session_manager
        .request_password_reset(&req.email)
        .await?
        .is_some()
    {
        tracing::info!("Password reset token ready for delivery");
    }

    Ok(Json(ApiResponse::ok(MessageResponse::new(
        RESET_REQUESTED_MESSAGE,
    ))))
}

/// PUT /api/auth/password-reset/{token}
pub async fn confirm_password_reset(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(req): Json<PasswordResetConfirmRequest>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    let req = validated(req)?;
    state
        .session_manager
        .confirm_password_reset(&token, &req.new_password)
        .await?;

    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Password has been reset",
    ))))
}
