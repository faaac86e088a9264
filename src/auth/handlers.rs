use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Form, Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{LoginForm, OwnedItem, PublicUser, RegisterRequest, RegisterResponse, TokenResponse},
        extractors::AuthUser,
        jwt::JwtKeys,
        service,
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/me", get(get_me).delete(delete_me))
        .route("/users/me/items", get(get_my_items))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let user = service::register(
        &state.db,
        &payload.username,
        &payload.email,
        payload.phone.as_deref(),
        &payload.password,
    )
    .await?;

    Ok(Json(RegisterResponse {
        username: user.username,
        email: user.email,
        phone: user.phone,
    }))
}

/// OAuth2 password-grant token endpoint: form-encoded credentials in, bearer
/// token out. Every credential failure gets the same generic 401.
#[instrument(skip(state, form))]
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, ApiError> {
    let user = service::authenticate(&state.db, &form.username, &form.password).await?;

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.issue(user.id)?;
    Ok(Json(TokenResponse::bearer(access_token)))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    let user = service::resolve_identity(&state.db, user_id).await?;
    Ok(Json(PublicUser::from(user)))
}

#[instrument(skip(state))]
pub async fn get_my_items(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<OwnedItem>>, ApiError> {
    let user = service::resolve_identity(&state.db, user_id).await?;
    Ok(Json(vec![OwnedItem {
        item_id: "Foo".to_string(),
        owner: user.username,
    }]))
}

#[instrument(skip(state))]
pub async fn delete_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<axum::http::StatusCode, ApiError> {
    let user = service::resolve_identity(&state.db, user_id).await?;
    service::deactivate(&state.db, user.id).await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    // Validation short-circuits before any query, so the lazily connecting
    // fake state never actually talks to a database.

    #[tokio::test]
    async fn register_rejects_invalid_email() {
        let state = AppState::fake();
        let payload = RegisterRequest {
            username: "alice".into(),
            email: "not-an-email".into(),
            phone: None,
            password: "secret123".into(),
        };
        let err = register(State(state), Json(payload)).await.unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn register_rejects_short_password() {
        let state = AppState::fake();
        let payload = RegisterRequest {
            username: "alice".into(),
            email: "alice@x.com".into(),
            phone: None,
            password: "short".into(),
        };
        let err = register(State(state), Json(payload)).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref m) if m == "Password too short"));
    }

    #[tokio::test]
    async fn register_rejects_empty_username() {
        let state = AppState::fake();
        let payload = RegisterRequest {
            username: "   ".into(),
            email: "alice@x.com".into(),
            phone: None,
            password: "secret123".into(),
        };
        let err = register(State(state), Json(payload)).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
