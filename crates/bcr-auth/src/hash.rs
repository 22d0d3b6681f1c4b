//! Password hashing utilities.

use bcr_core::{DEFAULT_BCRYPT_COST, MAX_BCRYPT_COST, MIN_BCRYPT_COST};

use crate::error::AuthError;

/// Salted bcrypt codec with a fixed cost factor.
///
/// Holds no mutable state; clones are cheap and safe to share between tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordCodec {
    cost: u32,
}

impl Default for PasswordCodec {
    fn default() -> Self {
        Self {
            cost: DEFAULT_BCRYPT_COST,
        }
    }
}

impl PasswordCodec {
    /// Create a codec with the given bcrypt cost.
    pub fn new(cost: u32) -> Result<Self, AuthError> {
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) {
            return Err(AuthError::validation(format!(
                "bcrypt cost must be between {MIN_BCRYPT_COST} and {MAX_BCRYPT_COST}"
            )));
        }
        Ok(Self { cost })
    }

    /// The configured cost factor.
    #[inline]
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a plaintext password.
    ///
    /// bcrypt only reads the first 72 bytes of its input.
    pub fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        bcrypt::hash(plaintext, self.cost).map_err(AuthError::internal)
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// A malformed hash is a mismatch, never an error.
    #[inline]
    pub fn verify(&self, plaintext: &str, hash: &str) -> bool {
        bcrypt::verify(plaintext, hash).unwrap_or(false)
    }

    /// [`hash`](Self::hash) on the blocking thread pool.
    pub async fn hash_blocking(&self, plaintext: &str) -> Result<String, AuthError> {
        let codec = *self;
        let plaintext = plaintext.to_owned();
        tokio::task::spawn_blocking(move || codec.hash(&plaintext))
            .await
            .map_err(AuthError::internal)?
    }

    /// [`verify`](Self::verify) on the blocking thread pool.
    pub async fn verify_blocking(&self, plaintext: &str, hash: &str) -> Result<bool, AuthError> {
        let codec = *self;
        let plaintext = plaintext.to_owned();
        let hash = hash.to_owned();
        tokio::task::spawn_blocking(move || codec.verify(&plaintext, &hash))
            .await
            .map_err(AuthError::internal)
    }
}
