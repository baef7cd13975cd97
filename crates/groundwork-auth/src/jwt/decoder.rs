//! Token verification.
//!
//! Every rejection looks the same to the caller: a bad signature, an expired
//! token and a token of the wrong kind all come back as `None`. The actual
//! cause is only logged at debug level.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::debug;

use groundwork_core::config::AuthConfig;
use groundwork_core::error::AppError;

use super::claims::{Claims, TokenType};

/// Verifies HS256-signed tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = config.jwt_leeway_seconds;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Verifies signature, then expiry, then that the token is of the
    /// `expected` kind.
    pub fn decode(&self, token: &str, expected: TokenType) -> Option<Claims> {
        let claims = match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => data.claims,
            Err(e) => {
                debug!(reason = ?e.kind(), "Token rejected");
                return None;
            }
        };

        if claims.token_type != expected {
            debug!(
                expected = ?expected,
                actual = ?claims.token_type,
                "Token rejected: wrong type"
            );
            return None;
        }

        Some(claims)
    }

    /// Like [`decode`](Self::decode), mapping rejection to the generic
    /// unauthenticated error.
    pub fn require(&self, token: &str, expected: TokenType) -> Result<Claims, AppError> {
        self.decode(token, expected)
            .ok_or_else(AppError::unauthenticated)
    }
}
