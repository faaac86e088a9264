use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::auth::claims::Claims;
use crate::state::AppState;

/// Why a presented token was rejected. `Expired` is deliberately its own
/// variant so the client can tell a stale token from a forged one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is malformed or its signature does not verify")]
    Invalid,
    #[error("token has expired")]
    Expired,
    #[error("token payload has no subject claim")]
    MissingSubject,
}

/// HS256 signing and verification keys plus the configured token lifetime.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let jwt = &state.config.jwt;
        Self::new(&jwt.secret, Duration::minutes(jwt.ttl_minutes))
    }
}

impl JwtKeys {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Mint a token for `user_id` with the configured lifetime.
    pub fn issue(&self, user_id: Uuid) -> anyhow::Result<String> {
        self.issue_with_ttl(user_id, self.ttl)
    }

    /// Mint a token with an explicit lifetime. A non-positive `ttl` produces
    /// an already-expired token, which tests rely on.
    pub fn issue_with_ttl(&self, user_id: Uuid, ttl: Duration) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            sub: Some(user_id),
            iat: now.unix_timestamp(),
            exp: (now + ttl).unix_timestamp(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user_id, "jwt signed");
        Ok(token)
    }

    /// Check signature and expiry, then extract the subject.
    pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        let mut validation = Validation::default();
        // Expiry is exact: no leeway.
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            }
        })?;

        let sub = data.claims.sub.ok_or(TokenError::MissingSubject)?;
        debug!(user_id = %sub, "jwt verified");
        Ok(sub)
    }
}
