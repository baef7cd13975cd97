//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use groundwork_entity::issue::Issue;
use groundwork_entity::user::{Role, User};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Access token.
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// Access token expiration.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiration.
    pub refresh_expires_at: DateTime<Utc>,
    /// Anti-forgery token.
    pub csrf_token: String,
    /// User info.
    pub user: UserResponse,
}

/// Refresh response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    /// New access token.
    pub access_token: String,
    /// Access token expiration.
    pub access_expires_at: DateTime<Utc>,
    /// Anti-forgery token.
    pub csrf_token: String,
}

/// User summary for responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID.
    pub id: Uuid,
    /// Email.
    pub email: String,
    /// Full name.
    pub full_name: String,
    /// Role name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Granted permission codenames.
    #[serde(default)]
    pub permissions: Vec<String>,
    /// Whether the e-mail address is verified.
    pub email_verified: bool,
    /// Created at.
    pub created_at: DateTime<Utc>,
    /// Last login.
    pub last_login_at: Option<DateTime<Utc>>,
}

impl UserResponse {
    /// Builds the response from a user and, when loaded, their role.
    pub fn new(user: &User, role: Option<&Role>) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            full_name: user.full_name(),
            role: role.map(|r| r.name.clone()),
            permissions: role
                .map(|r| r.codenames().map(String::from).collect())
                .unwrap_or_default(),
            email_verified: user.email_verified,
            created_at: user.created_at,
            last_login_at: user.last_login_at,
        }
    }
}

/// Issue response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueResponse {
    /// Issue ID.
    pub id: Uuid,
    /// Human-readable key.
    pub key: String,
    /// Sequence number within the project.
    pub number: i32,
    /// Title.
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Reporter.
    pub reporter_id: Uuid,
    /// Assignee.
    pub assignee_id: Option<Uuid>,
    /// Created at.
    pub created_at: DateTime<Utc>,
}

impl From<Issue> for IssueResponse {
    fn from(issue: Issue) -> Self {
        Self {
            id: issue.id,
            key: issue.key,
            number: issue.issue_number,
            title: issue.title,
            description: issue.description,
            reporter_id: issue.reporter_id,
            assignee_id: issue.assignee_id,
            created_at: issue.created_at,
        }
    }
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

impl MessageResponse {
    /// Creates a message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: String,
    /// Database reachability.
    pub database: String,
    /// Server version.
    pub version: String,
}
