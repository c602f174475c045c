use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{CurrentUserResponse, LoginRequest, TokenResponse},
    middleware::AuthUser,
    services,
};
use crate::{error::ApiError, extract::JsonBody, state::AppState};

pub fn public_routes() -> Router<AppState> {
    Router::new().route("/api/auth", post(login))
}

pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/api/auth", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = services::login(&state, payload).await?;
    Ok(Json(TokenResponse { token }))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<CurrentUserResponse>, ApiError> {
    let user = services::current_user(&state, user_id).await?;
    Ok(Json(CurrentUserResponse { user }))
}
