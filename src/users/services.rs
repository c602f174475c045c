use md5::{Digest, Md5};
use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use super::{dto::RegisterRequest, repo_types::User};
use crate::{
    auth::password::hash_password, error::ApiError, state::AppState,
    validation::normalize_email,
};

/// Avatar location derived from the email only; nothing is fetched.
pub fn avatar_url(template: &str, email: &str) -> String {
    let digest = Md5::digest(normalize_email(email).as_bytes());
    template.replace("{hash}", &format!("{digest:x}"))
}

/// Creates the account and returns a freshly issued token.
///
/// The duplicate check runs before the insert; two concurrent registrations of
/// the same address are still settled by the store's unique email rule.
pub async fn register(state: &AppState, req: RegisterRequest) -> Result<String, ApiError> {
    req.validate()?;
    let email = normalize_email(&req.email);

    if state.users.find_by_email(&email).await?.is_some() {
        warn!(%email, "email already registered");
        return Err(ApiError::DuplicateEmail);
    }

    let user = User {
        id: Uuid::new_v4(),
        name: req.name.trim().to_string(),
        avatar: avatar_url(&state.config.avatar_url_template, &email),
        email,
        password_hash: hash_password(&req.password)?,
        created_at: OffsetDateTime::now_utc(),
    };
    state.users.insert(&user).await?;

    let token = state.keys.issue(user.id)?;
    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(token)
}

/// Removes the profile and then the user. Posts, likes and comments written by
/// the user stay behind.
pub async fn delete_account(state: &AppState, user_id: Uuid) -> Result<(), ApiError> {
    let profile = state.profiles.delete_by_user(user_id).await?;
    let removed = state.users.delete(user_id).await?;
    info!(
        %user_id,
        profile_removed = profile.is_some(),
        user_removed = removed,
        "account deleted"
    );
    Ok(())
}
