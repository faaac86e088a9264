use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT payload used for authentication.
///
/// `sub` is optional at the serde level so that a token whose payload lacks
/// the subject claim decodes cleanly and can be rejected as its own error
/// kind instead of as a generic deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<Uuid>, // user ID
    pub exp: i64, // expires at (unix timestamp)
    pub iat: i64, // issued at (unix timestamp)
}
