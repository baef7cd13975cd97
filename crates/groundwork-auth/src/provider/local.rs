//! Local password-based provider.

use async_trait::async_trait;
use sqlx::PgConnection;
use tracing::{debug, info};
use uuid::Uuid;

use groundwork_core::config::AuthConfig;
use groundwork_core::result::AppResult;
use groundwork_database::repositories::UserRepository;
use groundwork_entity::user::{NewUser, User};

use super::{AuthProvider, CreateUser, normalize_email};
use crate::password::{PasswordHasher, PasswordValidator};

/// Authenticates against password hashes stored in the `users` table.
#[derive(Debug, Clone)]
pub struct LocalAuthProvider {
    hasher: PasswordHasher,
    validator: PasswordValidator,
}

impl LocalAuthProvider {
    /// Creates a provider using the configured password policy.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            hasher: PasswordHasher::new(),
            validator: PasswordValidator::new(config),
        }
    }
}

#[async_trait]
impl AuthProvider for LocalAuthProvider {
    async fn authenticate(
        &self,
        conn: &mut PgConnection,
        email: &str,
        password: &str,
    ) -> AppResult<Option<User>> {
        let Some(user) = UserRepository::find_by_email(conn, &normalize_email(email)).await? else {
            self.hasher.verify_decoy(password);
            debug!("Authentication failed: unknown account");
            return Ok(None);
        };

        if !self.hasher.verify(password, &user.password_hash) {
            debug!(user_id = %user.id, "Authentication failed: wrong password");
            return Ok(None);
        }

        if !user.is_active {
            debug!(user_id = %user.id, "Authentication failed: inactive account");
            return Ok(None);
        }

        Ok(Some(user))
    }

    async fn create_user(&self, conn: &mut PgConnection, data: CreateUser) -> AppResult<User> {
        self.validator.validate(&data.password)?;
        let password_hash = self.hasher.hash(&data.password)?;

        let user = UserRepository::create(
            conn,
            &NewUser {
                email: normalize_email(&data.email),
                password_hash,
                first_name: data.first_name,
                last_name: data.last_name,
                role_id: data.role_id,
            },
        )
        .await?;

        info!(user_id = %user.id, "User created");
        Ok(user)
    }

    async fn change_password(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
        new_password: &str,
    ) -> AppResult<()> {
        self.validator.validate(new_password)?;
        let password_hash = self.hasher.hash(new_password)?;
        UserRepository::update_password(conn, user_id, &password_hash).await?;

        info!(user_id = %user_id, "Password changed");
        Ok(())
    }

    async fn verify_email(&self, conn: &mut PgConnection, user_id: Uuid) -> AppResult<()> {
        UserRepository::mark_email_verified(conn, user_id).await
    }
}
