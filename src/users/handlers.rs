use axum::{
    extract::State,
    routing::{delete, post},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{MsgResponse, RegisterRequest},
    services,
};
use crate::{
    auth::{dto::TokenResponse, middleware::AuthUser},
    error::ApiError,
    extract::JsonBody,
    state::AppState,
};

pub fn public_routes() -> Router<AppState> {
    Router::new().route("/api/users", post(register))
}

pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/api/users", delete(delete_account))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = services::register(&state, payload).await?;
    Ok(Json(TokenResponse { token }))
}

#[instrument(skip(state))]
pub async fn delete_account(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<MsgResponse>, ApiError> {
    services::delete_account(&state, user_id).await?;
    Ok(Json(MsgResponse {
        msg: "User deleted".into(),
    }))
}
