use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Request-level error taxonomy. Every handler and service failure funnels
/// into one of these variants, and the single [`IntoResponse`] impl below is
/// the only place errors are translated to transport responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or rejected request data.
    #[error("{0}")]
    Validation(String),

    /// Credential check failed. Deliberately generic: unknown user, inactive
    /// user and wrong password all surface with this exact message so the
    /// response does not leak which check failed.
    #[error("Incorrect username or password")]
    Credentials,

    /// No usable Authorization header on a protected endpoint.
    #[error("Not authenticated")]
    MissingCredentials,

    /// Token is malformed, carries a bad signature, or lacks a subject.
    #[error("Could not validate credentials")]
    InvalidToken,

    /// Token signature is fine but the expiry has passed. Distinct from
    /// [`ApiError::InvalidToken`] so clients can decide to refresh vs re-login.
    #[error("Token expired")]
    ExpiredToken,

    /// Subject resolved to a soft-deleted account.
    #[error("Inactive user")]
    InactiveUser,

    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InactiveUser => StatusCode::BAD_REQUEST,
            ApiError::Credentials
            | ApiError::MissingCredentials
            | ApiError::InvalidToken
            | ApiError::ExpiredToken => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable code carried in the body alongside the message.
    fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::Credentials => "invalid_credentials",
            ApiError::MissingCredentials => "not_authenticated",
            ApiError::InvalidToken => "invalid_token",
            ApiError::ExpiredToken => "expired_token",
            ApiError::InactiveUser => "inactive_user",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Internal details stay in the logs, not in the response body.
        let detail = match &self {
            ApiError::Internal(e) => {
                error!(error = %e, "internal error");
                "internal error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({ "error": self.code(), "detail": detail }));
        let mut response = (status, body).into_response();

        // Every 401 carries the bearer challenge header.
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_errors_carry_bearer_challenge() {
        for err in [
            ApiError::Credentials,
            ApiError::MissingCredentials,
            ApiError::InvalidToken,
            ApiError::ExpiredToken,
        ] {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(
                response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
                "Bearer"
            );
        }
    }

    #[test]
    fn expired_and_invalid_tokens_are_distinguishable() {
        assert_ne!(ApiError::ExpiredToken.code(), ApiError::InvalidToken.code());
        assert_ne!(
            ApiError::ExpiredToken.to_string(),
            ApiError::InvalidToken.to_string()
        );
    }

    #[test]
    fn validation_maps_to_bad_request() {
        let response = ApiError::Validation("Invalid email".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn inactive_user_maps_to_bad_request() {
        let response = ApiError::InactiveUser.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
    }
}
