//! RBAC enforcement: permission checks with an explicit superuser bypass.

use tracing::warn;
use uuid::Uuid;

use groundwork_core::config::AuthConfig;
use groundwork_core::error::AppError;
use groundwork_entity::user::Role;

/// Pure membership check; an absent role has no permissions.
pub fn role_has_permission(role: Option<&Role>, codename: &str) -> bool {
    role.is_some_and(|r| r.has_permission(codename))
}

/// Enforces permission checks for request handlers.
///
/// The superuser role is recognised here, by name, and never inside
/// [`Role::has_permission`].
#[derive(Debug, Clone)]
pub struct RbacEnforcer {
    /// Name of the role that passes every check.
    superuser_role: String,
}

impl RbacEnforcer {
    /// Creates an enforcer from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            superuser_role: config.superuser_role.clone(),
        }
    }

    /// Returns whether the role is the configured superuser role.
    pub fn is_superuser(&self, role: Option<&Role>) -> bool {
        role.is_some_and(|r| r.name == self.superuser_role)
    }

    /// Checks whether the role may perform `codename`.
    pub fn has_permission(&self, role: Option<&Role>, codename: &str) -> bool {
        self.is_superuser(role) || role_has_permission(role, codename)
    }

    /// Returns `Ok(())` if allowed, or the generic forbidden error if denied.
    /// The denied codename is logged, not returned.
    pub fn require_permission(
        &self,
        user_id: Uuid,
        role: Option<&Role>,
        codename: &str,
    ) -> Result<(), AppError> {
        if self.has_permission(role, codename) {
            return Ok(());
        }

        warn!(
            user_id = %user_id,
            role = role.map(|r| r.name.as_str()).unwrap_or("<none>"),
            permission = codename,
            "Permission denied"
        );
        Err(AppError::forbidden())
    }
}
