//! Project repository implementation.

use sqlx::PgConnection;
use uuid::Uuid;

use groundwork_core::error::{AppError, ErrorKind};
use groundwork_core::result::AppResult;
use groundwork_entity::project::Project;

/// Queries on the `projects` table.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectRepository;

impl ProjectRepository {
    /// Create a project. The key is stored upper-cased.
    pub async fn create(
        conn: &mut PgConnection,
        key: &str,
        name: &str,
        owner_id: Uuid,
    ) -> AppResult<Project> {
        sqlx::query_as::<_, Project>(
            "INSERT INTO projects (key, name, owner_id) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(key.to_uppercase())
        .bind(name)
        .bind(owner_id)
        .fetch_one(conn)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::conflict(format!("Project key '{key}' already exists"))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create project", e),
        })
    }

    /// Lock the project row exclusively for the rest of the transaction and
    /// return its key.
    ///
    /// Concurrent callers for the same project queue behind this lock;
    /// other projects are unaffected.
    pub async fn lock_key(conn: &mut PgConnection, project_id: Uuid) -> AppResult<Option<String>> {
        sqlx::query_scalar::<_, String>("SELECT key FROM projects WHERE id = $1 FOR UPDATE")
            .bind(project_id)
            .fetch_optional(conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock project", e))
    }
}
