//! Default roles and permissions.
//!
//! Seeding is idempotent: it runs on every startup, creates what is missing
//! and grants newly introduced permissions to the existing system roles.

use sqlx::PgPool;
use tracing::info;

use groundwork_core::error::{AppError, ErrorKind};
use groundwork_core::result::AppResult;

use crate::repositories::RoleRepository;

/// Permission codenames and descriptions created at startup.
pub const DEFAULT_PERMISSIONS: &[(&str, &str)] = &[
    ("users:create", "Create users"),
    ("users:read", "View users"),
    ("users:update", "Update users"),
    ("users:delete", "Delete users"),
    ("roles:manage", "Manage roles"),
    ("settings:manage", "Manage system settings"),
    ("issues:create", "File issues in projects"),
];

/// A system role and the codenames it is granted.
#[derive(Debug, Clone, Copy)]
pub struct RoleSeed {
    /// Unique role name.
    pub name: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// Granted codenames. `None` grants every default permission.
    pub permissions: Option<&'static [&'static str]>,
}

/// System roles created at startup.
pub const DEFAULT_ROLES: &[RoleSeed] = &[
    RoleSeed {
        name: "Admin",
        description: "Full system access",
        permissions: None,
    },
    RoleSeed {
        name: "Manager",
        description: "Can manage users",
        permissions: Some(&[
            "users:read",
            "users:create",
            "users:update",
            "issues:create",
        ]),
    },
    RoleSeed {
        name: "Member",
        description: "Regular project member",
        permissions: Some(&["issues:create"]),
    },
    RoleSeed {
        name: "Guest",
        description: "Read-only access",
        permissions: Some(&[]),
    },
];

/// Seed default permissions and system roles in one transaction.
pub async fn seed_defaults(pool: &PgPool) -> AppResult<()> {
    let mut tx = pool.begin().await.map_err(|e| {
        AppError::with_source(ErrorKind::Database, "Failed to begin seed transaction", e)
    })?;

    let mut permissions = Vec::with_capacity(DEFAULT_PERMISSIONS.len());
    for (codename, description) in DEFAULT_PERMISSIONS {
        let permission = RoleRepository::upsert_permission(&mut tx, codename, description).await?;
        permissions.push(permission);
    }

    for seed in DEFAULT_ROLES {
        let role = RoleRepository::upsert_system_role(&mut tx, seed.name, seed.description).await?;

        let granted = permissions.iter().filter(|p| match seed.permissions {
            None => true,
            Some(codenames) => codenames.contains(&p.codename.as_str()),
        });
        for permission in granted {
            RoleRepository::grant(&mut tx, role.id, permission.id).await?;
        }
    }

    tx.commit().await.map_err(|e| {
        AppError::with_source(ErrorKind::Database, "Failed to commit seed transaction", e)
    })?;

    info!(
        permissions = DEFAULT_PERMISSIONS.len(),
        roles = DEFAULT_ROLES.len(),
        "Default roles and permissions seeded"
    );
    Ok(())
}
