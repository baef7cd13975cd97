//! Issue handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use groundwork_entity::issue::NewIssue;

use crate::dto::request::{CreateIssueRequest, validated};
use crate::dto::response::{ApiResponse, IssueResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::middleware::require_permission;
use crate::state::AppState;

/// Permission required to file an issue.
pub const CREATE_ISSUE_PERMISSION: &str = "issues:create";

/// POST /api/projects/{id}/issues
pub async fn create_issue(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<Uuid>,
    Json(req): Json<CreateIssueRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<IssueResponse>>)> {
    require_permission(&state, &auth, CREATE_ISSUE_PERMISSION)?;
    let req = validated(req)?;

    let issue = state
        .issue_service
        .create_issue(NewIssue {
            project_id,
            title: req.title,
            description: req.description,
            reporter_id: auth.user.id,
            assignee_id: req.assignee_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(issue.into()))))
}
