//! Per-project issue number assignment.
//!
//! The project row is locked `FOR UPDATE` before the current maximum is
//! read. Concurrent creators for the same project therefore run one after
//! another, while other projects are never blocked. The lock is released
//! when the caller's transaction commits or rolls back, so the caller must
//! insert the issue in that same transaction.

use sqlx::PgConnection;
use tracing::debug;
use uuid::Uuid;

use groundwork_core::error::AppError;
use groundwork_core::result::AppResult;
use groundwork_database::repositories::{IssueRepository, ProjectRepository};
use groundwork_entity::issue::IssueKey;

/// Reserves the next key for `project_id` inside the caller's transaction.
///
/// Fails with `NotFound` if the project does not exist.
pub async fn next_key(conn: &mut PgConnection, project_id: Uuid) -> AppResult<IssueKey> {
    let project_key = ProjectRepository::lock_key(&mut *conn, project_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Project {project_id} not found")))?;

    let number = IssueRepository::max_number(conn, project_id).await? + 1;
    let key = IssueKey::new(&project_key, number);

    debug!(project_id = %project_id, issue_key = %key, "Issue key reserved");
    Ok(key)
}
