use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::repo::User;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
}

/// Response returned after registration. The password never leaves the server.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
}

/// OAuth2 password-grant login form. `scope` and `grant_type` are part of
/// the form shape but unused here.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub grant_type: Option<String>,
}

/// Bearer token handed out by `/login`.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            phone: user.phone,
        }
    }
}

/// An item owned by the authenticated user.
#[derive(Debug, Serialize)]
pub struct OwnedItem {
    pub item_id: String,
    pub owner: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_response_serializes_bearer_type() {
        let json = serde_json::to_string(&TokenResponse::bearer("abc".into())).unwrap();
        assert!(json.contains(r#""access_token":"abc""#));
        assert!(json.contains(r#""token_type":"bearer""#));
    }

    #[test]
    fn public_user_never_contains_password_hash() {
        let user = User::test_user("alice", "alice@x.com");
        let json = serde_json::to_string(&PublicUser::from(user)).unwrap();
        assert!(json.contains("alice@x.com"));
        assert!(!json.contains("password"));
        assert!(!json.contains("argon2"));
    }

    #[test]
    fn login_form_accepts_minimal_fields() {
        let form: LoginForm =
            serde_urlencoded::from_str("username=alice&password=secret123").unwrap();
        assert_eq!(form.username, "alice");
        assert!(form.scope.is_none());
        assert!(form.grant_type.is_none());
    }
}
