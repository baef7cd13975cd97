//! RBAC helpers for guarding handlers.

use groundwork_core::error::AppError;

use crate::extractors::AuthUser;
use crate::state::AppState;

/// Checks that the authenticated user may perform `codename`.
///
/// The configured superuser role always passes.
pub fn require_permission(
    state: &AppState,
    auth: &AuthUser,
    codename: &str,
) -> Result<(), AppError> {
    state
        .rbac_enforcer
        .require_permission(auth.user.id, auth.role.as_ref(), codename)
}
