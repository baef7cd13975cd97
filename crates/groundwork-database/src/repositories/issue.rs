//! Issue repository implementation.

use sqlx::PgConnection;
use uuid::Uuid;

use groundwork_core::error::{AppError, ErrorKind};
use groundwork_core::result::AppResult;
use groundwork_entity::issue::{Issue, IssueKey, NewIssue};

/// Queries on the `issues` table.
#[derive(Debug, Clone, Copy, Default)]
pub struct IssueRepository;

impl IssueRepository {
    /// Highest issue number in a project, or 0 when it has none.
    pub async fn max_number(conn: &mut PgConnection, project_id: Uuid) -> AppResult<i32> {
        sqlx::query_scalar::<_, i32>(
            "SELECT COALESCE(MAX(issue_number), 0) FROM issues WHERE project_id = $1",
        )
        .bind(project_id)
        .fetch_one(conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to read issue sequence", e)
        })
    }

    /// Insert an issue under an already-assigned key.
    ///
    /// A duplicate `(project_id, issue_number)` surfaces as `Conflict`.
    pub async fn insert(
        conn: &mut PgConnection,
        data: &NewIssue,
        key: &IssueKey,
    ) -> AppResult<Issue> {
        sqlx::query_as::<_, Issue>(
            "INSERT INTO issues (project_id, key, issue_number, title, description, reporter_id, assignee_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING *",
        )
        .bind(data.project_id)
        .bind(&key.key)
        .bind(key.number)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.reporter_id)
        .bind(data.assignee_id)
        .fetch_one(conn)
        .await
        .map_err(AppError::from)
    }

    /// All issue numbers of a project in ascending order.
    pub async fn numbers_for_project(
        conn: &mut PgConnection,
        project_id: Uuid,
    ) -> AppResult<Vec<i32>> {
        sqlx::query_scalar::<_, i32>(
            "SELECT issue_number FROM issues WHERE project_id = $1 ORDER BY issue_number",
        )
        .bind(project_id)
        .fetch_all(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list issues", e))
    }
}
