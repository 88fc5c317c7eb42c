use tracing::debug;

use crate::{AppError, AppResult};

/// Lowest and highest work factors bcrypt accepts.
pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

/// bcrypt only reads this many bytes of input.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Stateless bcrypt wrapper, shared read-only between requests.
#[derive(Debug, Clone, Copy)]
pub struct CredentialHasher {
    cost: u32,
}

impl CredentialHasher {
    pub fn new(cost: u32) -> Self {
        CredentialHasher { cost }
    }

    /// Hash a password with a fresh random salt.
    ///
    /// Passwords longer than [`MAX_PASSWORD_BYTES`] are rejected rather than truncated.
    pub fn hash(&self, plaintext: &str) -> AppResult<String> {
        if plaintext.len() > MAX_PASSWORD_BYTES {
            return Err(AppError::PasswordTooLong);
        }
        Ok(bcrypt::non_truncating_hash(plaintext, self.cost)?)
    }

    /// Check a password against a stored digest.
    ///
    /// A malformed or foreign digest is a mismatch, never an error.
    pub fn verify(&self, plaintext: &str, digest: &str) -> bool {
        match bcrypt::non_truncating_verify(plaintext, digest) {
            Ok(matches) => matches,
            Err(err) => {
                debug!("treating unverifiable password hash as a mismatch: {err}");
                false
            }
        }
    }
}
