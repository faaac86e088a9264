use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;
use uuid::Uuid;

use crate::auth::jwt::{JwtKeys, TokenError};
use crate::error::ApiError;

/// Extracts and validates the bearer token, yielding the verified subject.
/// Identity resolution against the store happens in the handler.
#[derive(Debug)]
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);

        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::MissingCredentials)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
            .ok_or(ApiError::MissingCredentials)?;

        let sub = keys.verify(token).map_err(|e| {
            warn!(error = %e, "token rejected");
            match e {
                TokenError::Expired => ApiError::ExpiredToken,
                TokenError::Invalid | TokenError::MissingSubject => ApiError::InvalidToken,
            }
        })?;

        Ok(AuthUser(sub))
    }
}
