//! Issue entity model and the human-readable issue key.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A tracked issue. `(project_id, issue_number)` is unique.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Issue {
    /// Unique issue identifier.
    pub id: Uuid,
    /// Owning project.
    pub project_id: Uuid,
    /// Human-readable key, e.g. `PROJ-12`.
    pub key: String,
    /// Per-project sequence number.
    pub issue_number: i32,
    /// Issue title.
    pub title: String,
    /// Optional long description.
    pub description: Option<String>,
    /// User who filed the issue.
    pub reporter_id: Uuid,
    /// Optional assignee.
    pub assignee_id: Option<Uuid>,
    /// When the issue was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewIssue {
    /// Target project.
    pub project_id: Uuid,
    /// Issue title.
    pub title: String,
    /// Optional long description.
    pub description: Option<String>,
    /// User filing the issue.
    pub reporter_id: Uuid,
    /// Optional assignee.
    pub assignee_id: Option<Uuid>,
}

/// The next identifier minted for a project: `{project_key}-{number}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueKey {
    /// Formatted key.
    pub key: String,
    /// Sequence number.
    pub number: i32,
}

impl IssueKey {
    /// Builds the key for `number` within the project keyed `project_key`.
    pub fn new(project_key: &str, number: i32) -> Self {
        Self {
            key: format!("{project_key}-{number}"),
            number,
        }
    }
}

impl fmt::Display for IssueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}
