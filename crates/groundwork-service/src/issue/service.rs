//! Issue creation.

use sqlx::{PgPool, Postgres, Transaction};
use tracing::{info, warn};

use groundwork_core::error::{AppError, ErrorKind};
use groundwork_core::result::AppResult;
use groundwork_database::repositories::IssueRepository;
use groundwork_entity::issue::{Issue, NewIssue};

use super::sequence::next_key;

/// Creates issues with collision-free per-project keys.
#[derive(Debug, Clone)]
pub struct IssueService {
    pool: PgPool,
}

impl IssueService {
    /// Creates a new issue service.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates an issue, assigning the next key of its project.
    ///
    /// Key reservation and insert share one transaction. Should the unique
    /// `(project_id, issue_number)` constraint still fire, the whole attempt
    /// is repeated once in a fresh transaction before `Conflict` is returned.
    pub async fn create_issue(&self, data: NewIssue) -> AppResult<Issue> {
        if data.title.trim().is_empty() {
            return Err(AppError::validation("Issue title must not be empty"));
        }

        match self.try_create(&data).await {
            Err(e) if e.is(ErrorKind::Conflict) => {
                warn!(
                    project_id = %data.project_id,
                    error = %e,
                    "Issue number collision, retrying once"
                );
                self.try_create(&data).await
            }
            result => result,
        }
    }

    async fn try_create(&self, data: &NewIssue) -> AppResult<Issue> {
        let mut tx: Transaction<'static, Postgres> = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let key = next_key(&mut tx, data.project_id).await?;
        let issue = IssueRepository::insert(&mut tx, data, &key).await?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;

        info!(
            project_id = %issue.project_id,
            issue_key = %issue.key,
            "Issue created"
        );
        Ok(issue)
    }
}
