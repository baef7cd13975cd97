//! Integration tests for the credential flows.

use axum::http::StatusCode;
use sqlx::PgPool;

use groundwork_auth::jwt::{JwtDecoder, TokenType};
use groundwork_auth::password::PasswordHasher;
use groundwork_auth::provider::CreateUser;
use groundwork_core::error::{ErrorKind, INVALID_CREDENTIAL_MESSAGE};
use groundwork_database::repositories::{
    PasswordResetTokenRepository, RefreshTokenRepository, RoleRepository, UserRepository,
};

use crate::helpers::{TEST_PASSWORD, TestApp, test_config};

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_login_issues_tokens_and_stores_refresh_hash(pool: PgPool) {
    let app = TestApp::new(pool).await;
    let user = app.create_user("alice@example.com", "Member").await;

    let result = app
        .sessions()
        .login("alice@example.com", TEST_PASSWORD)
        .await
        .unwrap();

    let decoder = JwtDecoder::new(&test_config().auth);
    let claims = decoder
        .decode(&result.tokens.access_token, TokenType::Access)
        .unwrap();
    assert_eq!(claims.sub, user.id);
    assert!(!result.csrf_token.is_empty());

    let mut conn = app.db_pool.acquire().await.unwrap();
    let rows = RefreshTokenRepository::find_active_by_user(&mut conn, user.id, chrono::Utc::now())
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_ne!(rows[0].token_hash, result.tokens.refresh_token);
    assert!(PasswordHasher::new().verify(&result.tokens.refresh_token, &rows[0].token_hash));

    let stored = UserRepository::find_by_id(&mut conn, user.id)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.last_login_at.is_some());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_login_failures_are_indistinguishable(pool: PgPool) {
    let app = TestApp::new(pool).await;
    let user = app.create_user("bob@example.com", "Member").await;

    let wrong_password = app
        .sessions()
        .login("bob@example.com", "not-the-password")
        .await
        .unwrap_err();
    let unknown_user = app
        .sessions()
        .login("nobody@example.com", TEST_PASSWORD)
        .await
        .unwrap_err();

    let mut conn = app.db_pool.acquire().await.unwrap();
    UserRepository::set_active(&mut conn, user.id, false)
        .await
        .unwrap();
    let inactive = app
        .sessions()
        .login("bob@example.com", TEST_PASSWORD)
        .await
        .unwrap_err();

    for err in [&wrong_password, &unknown_user, &inactive] {
        assert!(err.is(ErrorKind::InvalidCredential));
        assert_eq!(err.message, INVALID_CREDENTIAL_MESSAGE);
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_login_email_is_case_insensitive(pool: PgPool) {
    let app = TestApp::new(pool).await;
    app.create_user("Carol@Example.com", "Member").await;

    assert!(
        app.sessions()
            .login("CAROL@example.COM", TEST_PASSWORD)
            .await
            .is_ok()
    );
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_refresh_mints_access_token(pool: PgPool) {
    let app = TestApp::new(pool).await;
    let user = app.create_user("dave@example.com", "Member").await;
    let login = app
        .sessions()
        .login("dave@example.com", TEST_PASSWORD)
        .await
        .unwrap();

    let refreshed = app
        .sessions()
        .refresh(&login.tokens.refresh_token)
        .await
        .unwrap();

    let decoder = JwtDecoder::new(&test_config().auth);
    let claims = decoder
        .decode(&refreshed.access_token, TokenType::Access)
        .unwrap();
    assert_eq!(claims.sub, user.id);
    assert_ne!(refreshed.csrf_token, login.csrf_token);

    // Access tokens are not refresh tokens.
    let err = app
        .sessions()
        .refresh(&login.tokens.access_token)
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Unauthenticated));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_refresh_denied_for_deactivated_user(pool: PgPool) {
    let app = TestApp::new(pool).await;
    let user = app.create_user("erin@example.com", "Member").await;
    let login = app
        .sessions()
        .login("erin@example.com", TEST_PASSWORD)
        .await
        .unwrap();

    let mut conn = app.db_pool.acquire().await.unwrap();
    UserRepository::set_active(&mut conn, user.id, false)
        .await
        .unwrap();

    let err = app
        .sessions()
        .refresh(&login.tokens.refresh_token)
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Unauthenticated));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_logout_revokes_refresh_token(pool: PgPool) {
    let app = TestApp::new(pool).await;
    let user = app.create_user("frank@example.com", "Member").await;
    let login = app
        .sessions()
        .login("frank@example.com", TEST_PASSWORD)
        .await
        .unwrap();

    assert!(app.sessions().logout(&login.tokens.refresh_token).await.unwrap());

    let mut conn = app.db_pool.acquire().await.unwrap();
    let rows = RefreshTokenRepository::find_unrevoked_by_user(&mut conn, user.id)
        .await
        .unwrap();
    assert!(rows.is_empty());

    let err = app
        .sessions()
        .refresh(&login.tokens.refresh_token)
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Unauthenticated));

    // A second logout finds nothing to revoke.
    assert!(!app.sessions().logout(&login.tokens.refresh_token).await.unwrap());
    assert!(!app.sessions().logout("garbage").await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_logout_leaves_other_sessions(pool: PgPool) {
    let app = TestApp::new(pool).await;
    app.create_user("gina@example.com", "Member").await;

    let first = app
        .sessions()
        .login("gina@example.com", TEST_PASSWORD)
        .await
        .unwrap();
    let second = app
        .sessions()
        .login("gina@example.com", TEST_PASSWORD)
        .await
        .unwrap();
    assert_ne!(first.tokens.refresh_token, second.tokens.refresh_token);

    assert!(app.sessions().logout(&first.tokens.refresh_token).await.unwrap());

    assert!(app.sessions().refresh(&first.tokens.refresh_token).await.is_err());
    assert!(app.sessions().refresh(&second.tokens.refresh_token).await.is_ok());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_logout_revokes_every_copy_of_the_secret(pool: PgPool) {
    let app = TestApp::new(pool).await;
    let user = app.create_user("hank@example.com", "Member").await;
    let login = app
        .sessions()
        .login("hank@example.com", TEST_PASSWORD)
        .await
        .unwrap();
    let secret = &login.tokens.refresh_token;

    // A second stored row for the very same secret.
    let mut conn = app.db_pool.acquire().await.unwrap();
    let digest = PasswordHasher::new().hash(secret).unwrap();
    RefreshTokenRepository::create(&mut conn, user.id, &digest, login.tokens.refresh_expires_at)
        .await
        .unwrap();

    assert!(app.sessions().logout(secret).await.unwrap());

    let rows = RefreshTokenRepository::find_unrevoked_by_user(&mut conn, user.id)
        .await
        .unwrap();
    assert!(rows.is_empty());

    let err = app.sessions().refresh(secret).await.unwrap_err();
    assert!(err.is(ErrorKind::Unauthenticated));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_password_reset_is_single_use(pool: PgPool) {
    let app = TestApp::new(pool).await;
    app.create_user("user@example.com", "Member").await;

    let token = app
        .sessions()
        .request_password_reset("user@example.com")
        .await
        .unwrap()
        .unwrap();
    let (selector, validator) = token.split_once('.').unwrap();
    assert_eq!(selector.len(), 16);
    assert!(!validator.is_empty());

    app.sessions()
        .confirm_password_reset(&token, "newpass123")
        .await
        .unwrap();

    let err = app
        .sessions()
        .confirm_password_reset(&token, "another123")
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::InvalidCredential));

    assert!(app.sessions().login("user@example.com", TEST_PASSWORD).await.is_err());
    assert!(app.sessions().login("user@example.com", "newpass123").await.is_ok());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_password_reset_revokes_all_sessions(pool: PgPool) {
    let app = TestApp::new(pool).await;
    let user = app.create_user("hank@example.com", "Member").await;
    let login = app
        .sessions()
        .login("hank@example.com", TEST_PASSWORD)
        .await
        .unwrap();

    let token = app
        .sessions()
        .request_password_reset("hank@example.com")
        .await
        .unwrap()
        .unwrap();
    app.sessions()
        .confirm_password_reset(&token, "brand-new-pass")
        .await
        .unwrap();

    let err = app
        .sessions()
        .refresh(&login.tokens.refresh_token)
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Unauthenticated));

    let mut conn = app.db_pool.acquire().await.unwrap();
    let active = RefreshTokenRepository::find_active_by_user(&mut conn, user.id, chrono::Utc::now())
        .await
        .unwrap();
    assert!(active.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_password_reset_rejections(pool: PgPool) {
    let app = TestApp::new(pool).await;
    let user = app.create_user("ivy@example.com", "Member").await;

    assert!(
        app.sessions()
            .request_password_reset("nobody@example.com")
            .await
            .unwrap()
            .is_none()
    );

    let token = app
        .sessions()
        .request_password_reset("ivy@example.com")
        .await
        .unwrap()
        .unwrap();
    let (selector, _) = token.split_once('.').unwrap();

    for bad in ["", "no-separator", &format!("{selector}.wrong-validator")] {
        let err = app
            .sessions()
            .confirm_password_reset(bad, "newpass123")
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::InvalidCredential), "accepted {bad:?}");
    }

    // A policy violation leaves the token usable.
    let err = app
        .sessions()
        .confirm_password_reset(&token, "short")
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Validation));

    let mut conn = app.db_pool.acquire().await.unwrap();
    let row = PasswordResetTokenRepository::find_by_selector(&mut conn, selector)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.user_id, user.id);
    assert!(row.used_at.is_none());

    app.sessions()
        .confirm_password_reset(&token, "newpass123")
        .await
        .unwrap();
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_reset_selector_collision_is_not_a_conflict(pool: PgPool) {
    let app = TestApp::new(pool).await;
    let user = app.create_user("ivan@example.com", "Member").await;

    let token = app
        .sessions()
        .request_password_reset("ivan@example.com")
        .await
        .unwrap()
        .unwrap();
    let (selector, _) = token.split_once('.').unwrap();

    let mut conn = app.db_pool.acquire().await.unwrap();
    let expires_at = chrono::Utc::now() + chrono::Duration::hours(1);
    let duplicate = PasswordResetTokenRepository::create(
        &mut conn,
        user.id,
        selector,
        "not-a-digest",
        expires_at,
    )
    .await
    .unwrap();
    assert!(duplicate.is_none());

    // The original row is untouched and still redeemable.
    app.sessions()
        .confirm_password_reset(&token, "newpass123")
        .await
        .unwrap();

    let second = app
        .sessions()
        .request_password_reset("ivan@example.com")
        .await
        .unwrap();
    assert!(second.is_some());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_password_reset_denied_for_inactive_user(pool: PgPool) {
    let app = TestApp::new(pool).await;
    let user = app.create_user("jack@example.com", "Member").await;

    let mut conn = app.db_pool.acquire().await.unwrap();
    UserRepository::set_active(&mut conn, user.id, false)
        .await
        .unwrap();

    assert!(
        app.sessions()
            .request_password_reset("jack@example.com")
            .await
            .unwrap()
            .is_none()
    );
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_concurrent_reset_confirms_consume_once(pool: PgPool) {
    let app = TestApp::new(pool).await;
    app.create_user("kim@example.com", "Member").await;

    let token = app
        .sessions()
        .request_password_reset("kim@example.com")
        .await
        .unwrap()
        .unwrap();

    let sessions = app.state.session_manager.clone();
    let (a, b) = tokio::join!(
        sessions.confirm_password_reset(&token, "first-new-pass"),
        sessions.confirm_password_reset(&token, "second-new-pass"),
    );

    assert_eq!(
        [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(),
        1
    );
    let failure = (if a.is_err() { a } else { b }).unwrap_err();
    assert!(failure.is(ErrorKind::InvalidCredential));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_verify_email_through_provider(pool: PgPool) {
    let app = TestApp::new(pool).await;
    let user = app.create_user("lee@example.com", "Member").await;
    assert!(!user.email_verified);

    let mut conn = app.db_pool.acquire().await.unwrap();
    app.sessions()
        .provider()
        .verify_email(&mut conn, user.id)
        .await
        .unwrap();

    let stored = UserRepository::find_by_id(&mut conn, user.id)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.email_verified);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_duplicate_email_conflicts(pool: PgPool) {
    let app = TestApp::new(pool).await;
    app.create_user("mia@example.com", "Member").await;

    let mut conn = app.db_pool.acquire().await.unwrap();
    let member = RoleRepository::find_by_name(&mut conn, "Member")
        .await
        .unwrap()
        .unwrap();
    let err = app
        .sessions()
        .provider()
        .create_user(
            &mut conn,
            CreateUser {
                email: "MIA@example.com".to_string(),
                password: TEST_PASSWORD.to_string(),
                first_name: "Mia".to_string(),
                last_name: "Two".to_string(),
                role_id: member.id,
            },
        )
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Conflict));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_http_login_me_and_refresh(pool: PgPool) {
    let app = TestApp::new(pool).await;
    let user = app.create_user("nora@example.com", "Manager").await;

    let data = app.login("nora@example.com", TEST_PASSWORD).await;
    let access = data["access_token"].as_str().unwrap();
    let refresh = data["refresh_token"].as_str().unwrap();
    assert!(data["csrf_token"].as_str().is_some());

    let me = app.request("GET", "/api/auth/me", None, Some(access)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["data"]["id"], user.id.to_string());
    assert_eq!(me.body["data"]["role"], "Manager");
    assert!(
        me.body["data"]["permissions"]
            .as_array()
            .unwrap()
            .iter()
            .any(|p| p == "users:read")
    );

    let refreshed = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(serde_json::json!({ "refresh_token": refresh })),
            None,
        )
        .await;
    assert_eq!(refreshed.status, StatusCode::OK);

    let logout = app
        .request(
            "POST",
            "/api/auth/logout",
            Some(serde_json::json!({ "refresh_token": refresh })),
            None,
        )
        .await;
    assert_eq!(logout.status, StatusCode::OK);

    let after = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(serde_json::json!({ "refresh_token": refresh })),
            None,
        )
        .await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_http_password_reset_response_is_generic(pool: PgPool) {
    let app = TestApp::new(pool).await;
    app.create_user("olga@example.com", "Member").await;

    let known = app
        .request(
            "POST",
            "/api/auth/password-reset",
            Some(serde_json::json!({ "email": "olga@example.com" })),
            None,
        )
        .await;
    let unknown = app
        .request(
            "POST",
            "/api/auth/password-reset",
            Some(serde_json::json!({ "email": "ghost@example.com" })),
            None,
        )
        .await;

    assert_eq!(known.status, StatusCode::OK);
    assert_eq!(unknown.status, StatusCode::OK);
    assert_eq!(known.body, unknown.body);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_http_reset_confirm_uses_configured_policy(pool: PgPool) {
    let app = TestApp::new(pool).await;
    app.create_user("jane@example.com", "Member").await;
    let token = app
        .sessions()
        .request_password_reset("jane@example.com")
        .await
        .unwrap()
        .unwrap();
    let path = format!("/api/auth/password-reset/{token}");

    let rejected = app
        .request(
            "PUT",
            &path,
            Some(serde_json::json!({ "new_password": "short" })),
            None,
        )
        .await;
    assert_eq!(rejected.status, StatusCode::BAD_REQUEST);
    assert_eq!(rejected.body["error"], "VALIDATION_ERROR");
    let expected = format!(
        "at least {} characters",
        test_config().auth.password_min_length
    );
    assert!(
        rejected.body["message"]
            .as_str()
            .unwrap()
            .contains(&expected)
    );

    let accepted = app
        .request(
            "PUT",
            &path,
            Some(serde_json::json!({ "new_password": "newpass123" })),
            None,
        )
        .await;
    assert_eq!(accepted.status, StatusCode::OK);
}
