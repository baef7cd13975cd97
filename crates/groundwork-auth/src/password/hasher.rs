//! Argon2id hashing and verification of passwords and other bearer secrets.

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use tracing::warn;

use groundwork_core::error::AppError;

/// Well-formed digest with the default cost parameters that no secret is
/// expected to match. Verifying against it costs the same as a real check.
const DECOY_DIGEST: &str = "$argon2id$v=19$m=19456,t=2,p=1$Rs8W1qgo3XqPYgCZY829Tw$dylTHNC3Dcx2+DoJRpq5KoJxuTp3+KDnprxFWD2dKiU";

/// One-way hashing for anything the system must recognise but never store:
/// login passwords, refresh tokens and reset validators.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Creates a new hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Hashes a secret with a fresh random salt. The PHC string embeds the
    /// salt and the cost parameters.
    pub fn hash(&self, secret: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = Argon2::default()
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Secret hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    /// Verifies a secret against a stored digest.
    ///
    /// Malformed digests yield `false`; this never fails.
    pub fn verify(&self, secret: &str, digest: &str) -> bool {
        let parsed = match PasswordHash::new(digest) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "Stored digest is not a valid PHC string");
                return false;
            }
        };

        Argon2::default()
            .verify_password(secret.as_bytes(), &parsed)
            .is_ok()
    }

    /// Burns one verification's worth of work against the decoy digest.
    ///
    /// Called when there is no stored digest to check, so that an unknown
    /// account takes as long to reject as a wrong password.
    pub fn verify_decoy(&self, secret: &str) {
        let _ = self.verify(secret, DECOY_DIGEST);
    }
}
