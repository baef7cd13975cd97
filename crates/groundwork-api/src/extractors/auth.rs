//! `AuthUser` extractor: pulls the bearer token from the Authorization
//! header and resolves it to an active user.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use groundwork_auth::session::AuthenticatedUser;
use groundwork_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated user available in handlers.
///
/// Every rejection is the same generic `Unauthenticated`, whether the
/// header is missing, the token is bad or the account is inactive.
#[derive(Debug, Clone)]
pub struct AuthUser(pub AuthenticatedUser);

impl std::ops::Deref for AuthUser {
    type Target = AuthenticatedUser;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Returns the token of a `Bearer` Authorization header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(bearer_token)
            .ok_or_else(AppError::unauthenticated)?;

        let authenticated = state.session_manager.authenticate_access(token).await?;
        Ok(AuthUser(authenticated))
    }
}
