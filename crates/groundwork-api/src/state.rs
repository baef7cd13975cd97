//! Application state shared across all handlers and extractors.

use std::sync::Arc;

use sqlx::PgPool;

use groundwork_auth::rbac::RbacEnforcer;
use groundwork_auth::session::SessionManager;
use groundwork_core::config::AppConfig;
use groundwork_service::issue::IssueService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped or cheaply clonable.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration, immutable after startup.
    pub config: Arc<AppConfig>,
    /// Database connection pool.
    pub db_pool: PgPool,
    /// Credential flows.
    pub session_manager: Arc<SessionManager>,
    /// Permission checks.
    pub rbac_enforcer: Arc<RbacEnforcer>,
    /// Issue creation.
    pub issue_service: Arc<IssueService>,
}

impl AppState {
    /// Wires every component from configuration and a pool.
    pub fn new(config: Arc<AppConfig>, db_pool: PgPool) -> Self {
        let auth_config = Arc::new(config.auth.clone());

        Self {
            session_manager: Arc::new(SessionManager::new(db_pool.clone(), auth_config)),
            rbac_enforcer: Arc::new(RbacEnforcer::new(&config.auth)),
            issue_service: Arc::new(IssueService::new(db_pool.clone())),
            db_pool,
            config,
        }
    }
}
