//! Role and permission entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A single capability, identified by an opaque codename such as `users:read`.
///
/// Immutable once created; roles reference permissions but never own them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Permission {
    /// Unique permission identifier.
    pub id: Uuid,
    /// Opaque capability tag.
    pub codename: String,
    /// Human-readable description.
    pub description: String,
}

/// A named bundle of permissions assigned to users.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Role {
    /// Unique role identifier.
    pub id: Uuid,
    /// Unique role name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// System roles are seeded at startup and cannot be renamed.
    pub is_system: bool,
    /// When the role was created.
    pub created_at: DateTime<Utc>,
    /// Permissions granted by this role; loaded separately from the row.
    #[sqlx(skip)]
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

impl Role {
    /// Returns `true` iff `codename` is literally present in this role's
    /// permission set.
    ///
    /// Pure set membership: superuser handling belongs to the caller.
    pub fn has_permission(&self, codename: &str) -> bool {
        self.permissions.iter().any(|p| p.codename == codename)
    }

    /// Returns the permission codenames granted by this role.
    pub fn codenames(&self) -> impl Iterator<Item = &str> {
        self.permissions.iter().map(|p| p.codename.as_str())
    }
}
