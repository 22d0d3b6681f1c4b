//! Signed session tokens.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use bcr_core::{DEFAULT_TOKEN_ISSUER, DEFAULT_TOKEN_TTL_SECS, MIN_TOKEN_SECRET_LEN};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AuthError;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Claims carried by every session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    pub iss: String,
}

/// Issues and validates HS256 session tokens bound to a username.
///
/// The only termination mechanism is expiry; there is no revocation list.
/// Tokens whose header names any algorithm other than HS256 are rejected.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
    issuer: String,
}

impl TokenIssuer {
    /// Create an issuer with the default lifetime and issuer name.
    ///
    /// Fails with [`AuthError::Internal`] when the secret is shorter than
    /// 16 bytes.
    pub fn new(secret: &[u8]) -> Result<Self, AuthError> {
        Self::with_options(
            secret,
            Duration::from_secs(DEFAULT_TOKEN_TTL_SECS),
            DEFAULT_TOKEN_ISSUER,
        )
    }

    pub fn with_options(
        secret: &[u8],
        ttl: Duration,
        issuer: impl Into<String>,
    ) -> Result<Self, AuthError> {
        if secret.len() < MIN_TOKEN_SECRET_LEN {
            return Err(AuthError::Internal(format!(
                "token signing secret must be at least {MIN_TOKEN_SECRET_LEN} bytes"
            )));
        }
        if ttl.is_zero() {
            return Err(AuthError::internal("token lifetime must be positive"));
        }
        let issuer = issuer.into();

        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.set_issuer(&[issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
            issuer,
        })
    }

    /// Token lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Sign a token for `username`, valid from now for the configured lifetime.
    pub fn issue(&self, username: &str) -> Result<String, AuthError> {
        self.issue_at(username, unix_now())
    }

    pub(crate) fn issue_at(&self, username: &str, issued_at: u64) -> Result<String, AuthError> {
        let claims = Claims {
            username: username.to_string(),
            iat: issued_at,
            exp: issued_at + self.ttl.as_secs(),
            iss: self.issuer.clone(),
        };
        encode(&Header::new(ALGORITHM), &claims, &self.encoding).map_err(AuthError::internal)
    }

    /// Verify signature, algorithm, issuer and expiry; return the username.
    pub fn validate(&self, token: &str) -> Result<String, AuthError> {
        self.claims(token).map(|claims| claims.username)
    }

    /// Like [`validate`](Self::validate) but returns every claim.
    pub fn claims(&self, token: &str) -> Result<Claims, AuthError> {
        match decode::<Claims>(token, &self.decoding, &self.validation) {
            Ok(data) => Ok(data.claims),
            Err(err) => match err.kind() {
                ErrorKind::ExpiredSignature => Err(AuthError::ExpiredToken),
                other => {
                    debug!(reason = ?other, "token rejected");
                    Err(AuthError::InvalidToken)
                }
            },
        }
    }
}

// Debug implementation (don't leak key material)
impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("issuer", &self.issuer)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

#[inline]
fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
