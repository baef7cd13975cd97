//! Pluggable credential backends.
//!
//! Session flows authenticate through [`AuthProvider`] so that another
//! backend can be added without touching callers. Every method takes the
//! caller's open transaction.

pub mod local;

use async_trait::async_trait;
use sqlx::PgConnection;
use uuid::Uuid;

use groundwork_core::result::AppResult;
use groundwork_entity::user::User;

pub use local::LocalAuthProvider;

/// Input for creating a user through a provider.
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// E-mail address; normalized by the provider.
    pub email: String,
    /// Plaintext password, checked against the password policy.
    pub password: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Assigned role.
    pub role_id: Uuid,
}

/// A source of user identities and credentials.
#[async_trait]
pub trait AuthProvider: Send + Sync + std::fmt::Debug {
    /// Returns the active user whose credentials match, or `None`.
    ///
    /// Unknown e-mail, inactive account and wrong secret are
    /// indistinguishable to the caller.
    async fn authenticate(
        &self,
        conn: &mut PgConnection,
        email: &str,
        password: &str,
    ) -> AppResult<Option<User>>;

    /// Creates a user with a hashed password.
    async fn create_user(&self, conn: &mut PgConnection, data: CreateUser) -> AppResult<User>;

    /// Replaces a user's password.
    async fn change_password(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
        new_password: &str,
    ) -> AppResult<()>;

    /// Marks a user's e-mail as verified.
    async fn verify_email(&self, conn: &mut PgConnection, user_id: Uuid) -> AppResult<()>;
}

/// Lower-cases and trims an e-mail address for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
