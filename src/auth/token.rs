//! Identity Tokens
//! Mission: Issue and validate signed, time-bounded identity tokens

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Default lifetime of an issued token.
pub const DEFAULT_VALIDITY_DAYS: i64 = 7;

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // subject (user id)
    pub iat: i64,    // issued-at, unix seconds
    pub exp: i64,    // expires-at, unix seconds
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is structurally malformed")]
    Malformed,
    #[error("token signature does not verify")]
    BadSignature,
    #[error("token has expired")]
    Expired,
}

#[derive(Debug, Error)]
#[error("failed to sign token: {0}")]
pub struct TokenIssueError(#[from] jsonwebtoken::errors::Error);

/// Signs and validates identity tokens with a process-wide secret.
///
/// Constructed once at startup from configuration and passed to call sites;
/// nothing here reads globals. Rotating the secret invalidates every
/// outstanding token, which is accepted behavior.
pub struct TokenAuthority {
    secret: String,
    validity: Duration,
}

impl TokenAuthority {
    pub fn new(secret: String, validity_days: i64) -> Self {
        Self {
            secret,
            validity: Duration::days(validity_days),
        }
    }

    /// Seconds an issued token stays valid, for login/register responses.
    pub fn validity_secs(&self) -> i64 {
        self.validity.num_seconds()
    }

    /// Issue a token for `user_id` against the server-local clock.
    pub fn issue(&self, user_id: Uuid) -> Result<String, TokenIssueError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issue a token with an explicit issuance instant. HMAC is
    /// deterministic, so identical inputs yield an identical token.
    pub fn issue_at(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<String, TokenIssueError> {
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.validity).timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;
        Ok(token)
    }

    /// Validate a token against the server-local clock.
    pub fn validate(&self, token: &str) -> Result<Uuid, TokenError> {
        self.validate_at(token, Utc::now())
    }

    /// Validate a token at an explicit instant.
    ///
    /// Order: parse, verify signature, check expiry, extract subject. No
    /// claim is trusted before the signature holds. The expiry boundary is
    /// exclusive: a token is already invalid at `now == exp`. No clock-skew
    /// leeway is applied.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<Uuid, TokenError> {
        // Expiry is checked below against the caller's `now`, not against
        // the library's own clock.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature => TokenError::BadSignature,
            _ => TokenError::Malformed,
        })?;

        if now.timestamp() >= data.claims.exp {
            return Err(TokenError::Expired);
        }

        Uuid::parse_str(&data.claims.sub).map_err(|_| TokenError::Malformed)
    }
}
