//! Project entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A project that owns a sequence of issues.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    /// Unique project identifier.
    pub id: Uuid,
    /// Short uppercase key used as the issue-key prefix, e.g. `PROJ`.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Owning user.
    pub owner_id: Uuid,
    /// When the project was created.
    pub created_at: DateTime<Utc>,
}
