use tracing::{info, warn};
use uuid::Uuid;

use super::{dto::LoginRequest, password::verify_password};
use crate::{
    error::ApiError, state::AppState, users::repo_types::User, validation::normalize_email,
};

/// Verifies credentials and issues a token. Unknown email and wrong password
/// are indistinguishable to the caller.
pub async fn login(state: &AppState, req: LoginRequest) -> Result<String, ApiError> {
    req.validate()?;
    let email = normalize_email(&req.email);

    let Some(user) = state.users.find_by_email(&email).await? else {
        warn!(%email, "login unknown email");
        return Err(ApiError::InvalidCredentials);
    };

    if !verify_password(&req.password, &user.password_hash)? {
        warn!(%email, user_id = %user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let token = state.keys.issue(user.id)?;
    info!(
        user_id = %user.id,
        expires_in = state.keys.ttl().whole_seconds(),
        "user logged in"
    );
    Ok(token)
}

/// The token can outlive the account it names.
pub async fn current_user(state: &AppState, user_id: Uuid) -> Result<User, ApiError> {
    state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or(ApiError::NotFound("User not found"))
}
