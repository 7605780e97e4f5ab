//! HS256 identity tokens.
//!
//! The signing secret, lifetime and clock are fixed at construction. Expiry
//! is checked against the injected clock with zero leeway, so jsonwebtoken's
//! own wall-clock check is disabled.

use std::sync::Arc;

use chrono::Duration;
use domain::Clock;
use jsonwebtoken::{decode, decode_header, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token generation failed: {0}")]
    GenerationFailed(String),

    /// Malformed token or a signature that does not verify
    #[error("token parse failed: {0}")]
    ParseFailed(String),

    /// Signed correctly but expired or otherwise not acceptable
    #[error("invalid token")]
    InvalidToken,

    /// The payload is not shaped like [`Claims`]
    #[error("invalid claims type")]
    InvalidClaimsType,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature
            | ErrorKind::ImmatureSignature
            | ErrorKind::MissingRequiredClaim(_)
            | ErrorKind::InvalidIssuer
            | ErrorKind::InvalidAudience
            | ErrorKind::InvalidSubject => TokenError::InvalidToken,
            ErrorKind::Json(_) => TokenError::InvalidClaimsType,
            _ => TokenError::ParseFailed(err.to_string()),
        }
    }
}

/// Issues and verifies time-bounded identity tokens.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait TokenIssuer: Send + Sync {
    /// Sign a token for `subject`.
    fn issue(&self, subject: &str) -> Result<String, TokenError>;

    /// Verify `token` and return its subject.
    fn parse(&self, token: &str) -> Result<String, TokenError>;
}

pub struct JwtIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl JwtIssuer {
    pub fn new(secret: &[u8], ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl,
            clock,
        }
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation
    }
}

impl TokenIssuer for JwtIssuer {
    fn issue(&self, subject: &str) -> Result<String, TokenError> {
        let now = self.clock.now();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::GenerationFailed(e.to_string()))
    }

    fn parse(&self, token: &str) -> Result<String, TokenError> {
        // A payload that fails to deserialize is a claims problem, a header that
        // fails is a malformed token.
        decode_header(token).map_err(|e| TokenError::ParseFailed(e.to_string()))?;

        let data = decode::<Claims>(token, &self.decoding_key, &Self::validation())?;

        if data.claims.exp <= self.clock.now().timestamp() {
            return Err(TokenError::InvalidToken);
        }

        Ok(data.claims.sub)
    }
}
