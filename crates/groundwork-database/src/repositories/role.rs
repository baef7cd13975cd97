//! Role and permission repository implementation.

use sqlx::PgConnection;
use uuid::Uuid;

use groundwork_core::error::{AppError, ErrorKind};
use groundwork_core::result::AppResult;
use groundwork_entity::user::{Permission, Role};

/// Queries on `roles`, `permissions` and `role_permissions`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleRepository;

impl RoleRepository {
    /// Load a role together with its permission set.
    pub async fn find_with_permissions(
        conn: &mut PgConnection,
        role_id: Uuid,
    ) -> AppResult<Option<Role>> {
        let role = sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE id = $1")
            .bind(role_id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find role", e))?;

        let Some(mut role) = role else {
            return Ok(None);
        };

        role.permissions = Self::permissions_for(conn, role.id).await?;
        Ok(Some(role))
    }

    /// Find a role by unique name, without permissions.
    pub async fn find_by_name(conn: &mut PgConnection, name: &str) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE name = $1")
            .bind(name)
            .fetch_optional(conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find role by name", e)
            })
    }

    /// List the permissions granted to a role.
    pub async fn permissions_for(
        conn: &mut PgConnection,
        role_id: Uuid,
    ) -> AppResult<Vec<Permission>> {
        sqlx::query_as::<_, Permission>(
            "SELECT p.* FROM permissions p \
             JOIN role_permissions rp ON rp.permission_id = p.id \
             WHERE rp.role_id = $1 \
             ORDER BY p.codename",
        )
        .bind(role_id)
        .fetch_all(conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load role permissions", e)
        })
    }

    /// Insert a permission if its codename is new; returns the stored row.
    pub async fn upsert_permission(
        conn: &mut PgConnection,
        codename: &str,
        description: &str,
    ) -> AppResult<Permission> {
        sqlx::query_as::<_, Permission>(
            "INSERT INTO permissions (codename, description) VALUES ($1, $2) \
             ON CONFLICT (codename) DO UPDATE SET codename = EXCLUDED.codename \
             RETURNING *",
        )
        .bind(codename)
        .bind(description)
        .fetch_one(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert permission", e))
    }

    /// Insert a system role if its name is new; existing roles are marked as system roles.
    pub async fn upsert_system_role(
        conn: &mut PgConnection,
        name: &str,
        description: &str,
    ) -> AppResult<Role> {
        sqlx::query_as::<_, Role>(
            "INSERT INTO roles (name, description, is_system) VALUES ($1, $2, TRUE) \
             ON CONFLICT (name) DO UPDATE SET is_system = TRUE \
             RETURNING *",
        )
        .bind(name)
        .bind(description)
        .fetch_one(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert role", e))
    }

    /// Grant a permission to a role; a no-op if already granted.
    pub async fn grant(
        conn: &mut PgConnection,
        role_id: Uuid,
        permission_id: Uuid,
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO role_permissions (role_id, permission_id) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(role_id)
        .bind(permission_id)
        .execute(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to grant permission", e))?;
        Ok(())
    }
}
