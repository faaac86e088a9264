use sqlx::PgPool;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::password::{hash_password_async, verify_password_async};
use crate::auth::repo::User;
use crate::error::ApiError;

use lazy_static::lazy_static;
use regex::Regex;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Why a credential check failed. The three rejection branches stay distinct
/// here so logs can tell them apart, while the HTTP boundary collapses all of
/// them into one generic message.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("user not found")]
    UnknownUser,
    #[error("inactive user")]
    InactiveUser,
    #[error("incorrect password")]
    WrongPassword,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::UnknownUser | AuthError::InactiveUser | AuthError::WrongPassword => {
                ApiError::Credentials
            }
            AuthError::Internal(e) => ApiError::Internal(e),
        }
    }
}

/// Check credentials against the store and record the login.
///
/// `identifier` may be a username or an email. On success `last_login_at`
/// is updated and the user returned.
pub async fn authenticate(
    db: &PgPool,
    identifier: &str,
    password: &str,
) -> Result<User, AuthError> {
    let user = match User::find_by_identifier(db, identifier).await? {
        Some(u) => u,
        None => {
            warn!(identifier = %identifier, "authenticate: unknown user");
            return Err(AuthError::UnknownUser);
        }
    };

    if !user.is_active() {
        warn!(user_id = %user.id, "authenticate: inactive user");
        return Err(AuthError::InactiveUser);
    }

    let ok = verify_password_async(password.to_string(), user.password_hash.clone()).await?;
    if !ok {
        warn!(user_id = %user.id, "authenticate: incorrect password");
        return Err(AuthError::WrongPassword);
    }

    User::touch_last_login(db, user.id).await?;
    info!(user_id = %user.id, username = %user.username, "user authenticated");
    Ok(user)
}

/// Create a new account after validating the request fields.
pub async fn register(
    db: &PgPool,
    username: &str,
    email: &str,
    phone: Option<&str>,
    password: &str,
) -> Result<User, ApiError> {
    let email = email.trim().to_lowercase();
    let username = username.trim();

    if username.is_empty() {
        return Err(ApiError::Validation("Username must not be empty".into()));
    }
    if !is_valid_email(&email) {
        warn!(email = %email, "register: invalid email");
        return Err(ApiError::Validation("Invalid email".into()));
    }
    if password.len() < 8 {
        warn!("register: password too short");
        return Err(ApiError::Validation("Password too short".into()));
    }

    if User::find_by_email(db, &email).await?.is_some() {
        warn!(email = %email, "register: email already registered");
        return Err(ApiError::Validation("Email already registered".into()));
    }
    if User::find_by_username(db, username).await?.is_some() {
        warn!(username = %username, "register: username already taken");
        return Err(ApiError::Validation("Username already taken".into()));
    }

    let hash = hash_password_async(password.to_string()).await?;
    let user = User::create(db, username, &email, phone, &hash).await?;
    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok(user)
}

/// Soft-delete an account. The row stays for audit; the account stops
/// authenticating and existing tokens stop resolving.
pub async fn deactivate(db: &PgPool, user_id: Uuid) -> Result<(), ApiError> {
    User::soft_delete(db, user_id).await?;
    info!(user_id = %user_id, "user deactivated");
    Ok(())
}

/// Map a verified token subject back to a user record. Unknown subjects are
/// rejected like any other bad token; soft-deleted accounts get their own
/// error so the caller knows re-login will not help.
pub async fn resolve_identity(db: &PgPool, user_id: Uuid) -> Result<User, ApiError> {
    let user = match User::find_by_id(db, user_id).await? {
        Some(u) => u,
        None => {
            warn!(user_id = %user_id, "token subject does not resolve to a user");
            return Err(ApiError::InvalidToken);
        }
    };
    if !user.is_active() {
        warn!(user_id = %user.id, "token subject is a soft-deleted user");
        return Err(ApiError::InactiveUser);
    }
    Ok(user)
}
