//! Router tests that never reach the database.

use axum::http::StatusCode;

use groundwork_core::error::{INVALID_CREDENTIAL_MESSAGE, UNAUTHENTICATED_MESSAGE};

use crate::helpers::{TestApp, unreachable_pool};

#[tokio::test]
async fn test_me_requires_bearer_token() {
    let app = TestApp::without_seed(unreachable_pool());

    let missing = app.request("GET", "/api/auth/me", None, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.body["message"], UNAUTHENTICATED_MESSAGE);

    let garbage = app
        .request("GET", "/api/auth/me", None, Some("not.a.token"))
        .await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
    assert_eq!(garbage.body, missing.body);
}

#[tokio::test]
async fn test_issue_creation_requires_bearer_token() {
    let app = TestApp::without_seed(unreachable_pool());

    let response = app
        .request(
            "POST",
            &format!("/api/projects/{}/issues", uuid::Uuid::new_v4()),
            Some(serde_json::json!({ "title": "x" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_validates_input() {
    let app = TestApp::without_seed(unreachable_pool());

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({ "email": "not-an-email", "password": "x" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_malformed_reset_token_rejected_without_database() {
    let app = TestApp::without_seed(unreachable_pool());

    let response = app
        .request(
            "PUT",
            "/api/auth/password-reset/no-separator-here",
            Some(serde_json::json!({ "new_password": "newpass123" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], INVALID_CREDENTIAL_MESSAGE);
}

#[tokio::test]
async fn test_refresh_with_garbage_is_unauthenticated() {
    let app = TestApp::without_seed(unreachable_pool());

    let response = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(serde_json::json!({ "refresh_token": "garbage" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_reports_unreachable_database() {
    let app = TestApp::without_seed(unreachable_pool());

    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body["data"]["database"], "unreachable");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_health_ok(pool: sqlx::PgPool) {
    let app = TestApp::new(pool).await;

    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
}
