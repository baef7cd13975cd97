//! Session lifecycle manager.
//!
//! Each public operation owns exactly one database transaction. Early
//! returns drop the transaction, which rolls it back.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, info, warn};

use groundwork_core::config::AuthConfig;
use groundwork_core::error::{AppError, ErrorKind};
use groundwork_core::result::AppResult;
use groundwork_database::repositories::{
    PasswordResetTokenRepository, RefreshTokenRepository, RoleRepository, UserRepository,
};
use groundwork_entity::user::{Role, User};

use crate::jwt::{JwtDecoder, JwtEncoder, TokenPair, TokenType};
use crate::password::PasswordHasher;
use crate::provider::{AuthProvider, LocalAuthProvider, normalize_email};
use crate::random;
use crate::reset::ResetToken;

/// Fresh tokens tried before a selector collision is treated as a fault.
const RESET_INSERT_ATTEMPTS: usize = 2;

/// Result of a successful login.
#[derive(Debug, Clone, serde::Serialize)]
pub struct LoginResult {
    /// Access and refresh tokens.
    pub tokens: TokenPair,
    /// Fresh anti-forgery token.
    pub csrf_token: String,
    /// The authenticated user.
    pub user: User,
}

/// Result of a successful refresh.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RefreshResult {
    /// Newly minted access token.
    pub access_token: String,
    /// Its expiry.
    pub access_expires_at: DateTime<Utc>,
    /// Fresh anti-forgery token.
    pub csrf_token: String,
}

/// The identity behind a valid access token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// The active user.
    pub user: User,
    /// The user's role with its permissions, if the role row exists.
    pub role: Option<Role>,
}

/// Orchestrates every credential flow.
#[derive(Clone)]
pub struct SessionManager {
    pool: PgPool,
    config: Arc<AuthConfig>,
    encoder: JwtEncoder,
    decoder: JwtDecoder,
    hasher: PasswordHasher,
    provider: Arc<dyn AuthProvider>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("config", &self.config)
            .field("provider", &self.provider)
            .finish()
    }
}

impl SessionManager {
    /// Creates a session manager backed by the local password provider.
    pub fn new(pool: PgPool, config: Arc<AuthConfig>) -> Self {
        let provider = Arc::new(LocalAuthProvider::new(&config));
        Self::with_provider(pool, config, provider)
    }

    /// Creates a session manager with a custom credential provider.
    pub fn with_provider(
        pool: PgPool,
        config: Arc<AuthConfig>,
        provider: Arc<dyn AuthProvider>,
    ) -> Self {
        Self {
            pool,
            encoder: JwtEncoder::new(&config),
            decoder: JwtDecoder::new(&config),
            hasher: PasswordHasher::new(),
            provider,
            config,
        }
    }

    /// The credential provider in use.
    pub fn provider(&self) -> &Arc<dyn AuthProvider> {
        &self.provider
    }

    /// The token decoder, for callers that gate requests.
    pub fn decoder(&self) -> &JwtDecoder {
        &self.decoder
    }

    /// Verifies credentials, records the login and issues a token pair.
    ///
    /// Every failure is the same generic `InvalidCredential`.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginResult> {
        let mut tx = self.begin().await?;

        let Some(user) = self.provider.authenticate(&mut tx, email, password).await? else {
            warn!("Login failed");
            return Err(AppError::invalid_credential());
        };

        UserRepository::update_last_login(&mut tx, user.id).await?;

        let tokens = self.encoder.generate_token_pair(user.id)?;
        let refresh_hash = self.hasher.hash(&tokens.refresh_token)?;
        RefreshTokenRepository::create(&mut tx, user.id, &refresh_hash, tokens.refresh_expires_at)
            .await?;

        commit(tx).await?;

        info!(user_id = %user.id, "Login successful");
        Ok(LoginResult {
            tokens,
            csrf_token: random::csrf_token(),
            user,
        })
    }

    /// Exchanges a refresh token for a new access token.
    ///
    /// The refresh token is matched by hash against the user's active rows
    /// and is not rotated.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<RefreshResult> {
        let claims = self.decoder.require(refresh_token, TokenType::Refresh)?;
        let user_id = claims.user_id();

        let mut tx = self.begin().await?;

        let active = RefreshTokenRepository::find_active_by_user(&mut tx, user_id, Utc::now()).await?;
        if !active
            .iter()
            .any(|row| self.hasher.verify(refresh_token, &row.token_hash))
        {
            debug!(user_id = %user_id, "Refresh denied: no matching active token");
            return Err(AppError::unauthenticated());
        }

        match UserRepository::find_by_id(&mut tx, user_id).await? {
            Some(user) if user.is_active => {}
            _ => {
                debug!(user_id = %user_id, "Refresh denied: user missing or inactive");
                return Err(AppError::unauthenticated());
            }
        }

        commit(tx).await?;

        let (access_token, access_expires_at) = self.encoder.generate_access_token(user_id)?;
        info!(user_id = %user_id, "Access token refreshed");
        Ok(RefreshResult {
            access_token,
            access_expires_at,
            csrf_token: random::csrf_token(),
        })
    }

    /// Revokes the refresh token. Returns `false` when nothing matched.
    ///
    /// Every unrevoked row the secret verifies against is revoked, so no
    /// copy of a logged-out secret can refresh again.
    pub async fn logout(&self, refresh_token: &str) -> AppResult<bool> {
        let Some(claims) = self.decoder.decode(refresh_token, TokenType::Refresh) else {
            return Ok(false);
        };
        let user_id = claims.user_id();

        let mut tx = self.begin().await?;

        let unrevoked = RefreshTokenRepository::find_unrevoked_by_user(&mut tx, user_id).await?;
        let now = Utc::now();
        let mut revoked = 0u32;
        for row in unrevoked
            .iter()
            .filter(|row| self.hasher.verify(refresh_token, &row.token_hash))
        {
            if RefreshTokenRepository::revoke(&mut tx, row.id, now).await? {
                revoked += 1;
            }
        }

        if revoked == 0 {
            debug!(user_id = %user_id, "Logout: no matching token");
            return Ok(false);
        }

        commit(tx).await?;

        info!(user_id = %user_id, revoked, "Logout completed");
        Ok(true)
    }

    /// Issues a password-reset token for an active user.
    ///
    /// Returns `None` for unknown or inactive accounts; callers must still
    /// report success.
    pub async fn request_password_reset(&self, email: &str) -> AppResult<Option<String>> {
        let mut tx = self.begin().await?;

        let user = match UserRepository::find_by_email(&mut tx, &normalize_email(email)).await? {
            Some(user) if user.is_active => user,
            _ => {
                debug!("Password reset requested for unknown or inactive account");
                return Ok(None);
            }
        };

        let expires_at = Utc::now() + self.config.reset_token_ttl();
        let mut issued = None;
        for _ in 0..RESET_INSERT_ATTEMPTS {
            let token = ResetToken::generate();
            let validator_hash = self.hasher.hash(token.validator())?;
            if PasswordResetTokenRepository::create(
                &mut tx,
                user.id,
                token.selector(),
                &validator_hash,
                expires_at,
            )
            .await?
            .is_some()
            {
                issued = Some(token);
                break;
            }
            warn!(user_id = %user.id, "Reset selector collision, regenerating");
        }
        let Some(token) = issued else {
            return Err(AppError::internal("Could not allocate a unique reset selector"));
        };

        commit(tx).await?;

        info!(user_id = %user.id, "Password reset token issued");
        Ok(Some(token.to_string()))
    }

    /// Consumes a reset token and sets a new password.
    ///
    /// On success every active refresh token of the user is revoked.
    pub async fn confirm_password_reset(&self, token: &str, new_password: &str) -> AppResult<()> {
        let Some(token) = ResetToken::parse(token) else {
            debug!("Password reset rejected: malformed token");
            return Err(AppError::invalid_credential());
        };

        let now = Utc::now();
        let mut tx = self.begin().await?;

        let Some(row) =
            PasswordResetTokenRepository::find_usable_for_update(&mut tx, token.selector(), now)
                .await?
        else {
            debug!("Password reset rejected: no usable token for selector");
            return Err(AppError::invalid_credential());
        };

        if !self.hasher.verify(token.validator(), &row.token_hash) {
            warn!(user_id = %row.user_id, "Password reset rejected: validator mismatch");
            return Err(AppError::invalid_credential());
        }

        self.provider
            .change_password(&mut tx, row.user_id, new_password)
            .await?;

        if !PasswordResetTokenRepository::mark_used(&mut tx, row.id, now).await? {
            return Err(AppError::invalid_credential());
        }

        let revoked = RefreshTokenRepository::revoke_all_for_user(&mut tx, row.user_id, now).await?;

        commit(tx).await?;

        info!(
            user_id = %row.user_id,
            revoked_sessions = revoked,
            "Password reset completed"
        );
        Ok(())
    }

    /// Resolves an access token to its active user and role.
    pub async fn authenticate_access(&self, access_token: &str) -> AppResult<AuthenticatedUser> {
        let claims = self.decoder.require(access_token, TokenType::Access)?;

        let mut conn = self.pool.acquire().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to acquire connection", e)
        })?;

        let user = match UserRepository::find_by_id(&mut conn, claims.user_id()).await? {
            Some(user) if user.is_active => user,
            _ => return Err(AppError::unauthenticated()),
        };
        let role = RoleRepository::find_with_permissions(&mut conn, user.role_id).await?;

        Ok(AuthenticatedUser { user, role })
    }

    async fn begin(&self) -> AppResult<Transaction<'static, Postgres>> {
        self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })
    }
}

async fn commit(tx: Transaction<'static, Postgres>) -> AppResult<()> {
    tx.commit()
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e))
}
