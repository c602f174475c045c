use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{
        EducationRequest, ExperienceRequest, ProfileDeletedResponse, ProfileRequest,
        ProfileSavedResponse, ProfileWithOwner,
    },
    repo_types::Profile,
    services,
};
use crate::{
    auth::middleware::AuthUser, error::ApiError, extract::JsonBody, state::AppState,
    validation::parse_id,
};

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/profile", get(list_profiles))
        .route("/api/profile/user/:user_id", get(get_profile_by_user))
}

pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/api/profile", post(upsert_profile).delete(delete_profile))
        .route("/api/profile/me", get(get_my_profile))
        .route("/api/profile/experience", put(add_experience))
        .route("/api/profile/experience/:exp_id", delete(remove_experience))
        .route("/api/profile/education", put(add_education))
        .route("/api/profile/education/:edu_id", delete(remove_education))
}

#[instrument(skip(state))]
pub async fn list_profiles(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProfileWithOwner>>, ApiError> {
    Ok(Json(services::list_profiles(&state).await?))
}

#[instrument(skip(state))]
pub async fn get_profile_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ProfileWithOwner>, ApiError> {
    let user_id = parse_id(&user_id, "Profile not found")?;
    Ok(Json(services::get_profile_with_owner(&state, user_id).await?))
}

#[instrument(skip(state))]
pub async fn get_my_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProfileWithOwner>, ApiError> {
    Ok(Json(services::get_profile_with_owner(&state, user_id).await?))
}

#[instrument(skip(state, payload))]
pub async fn upsert_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    JsonBody(payload): JsonBody<ProfileRequest>,
) -> Result<Json<ProfileSavedResponse>, ApiError> {
    let (profile, created) = services::upsert_profile(&state, user_id, payload).await?;
    let msg = if created {
        "Create profile successfully"
    } else {
        "Update profile successfully"
    };
    Ok(Json(ProfileSavedResponse { msg, profile }))
}

#[instrument(skip(state))]
pub async fn delete_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProfileDeletedResponse>, ApiError> {
    let profile = services::delete_profile(&state, user_id).await?;
    Ok(Json(ProfileDeletedResponse {
        msg: "Profile deleted",
        profile,
    }))
}

#[instrument(skip(state, payload))]
pub async fn add_experience(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    JsonBody(payload): JsonBody<ExperienceRequest>,
) -> Result<Json<Profile>, ApiError> {
    Ok(Json(services::add_experience(&state, user_id, payload).await?))
}

#[instrument(skip(state))]
pub async fn remove_experience(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(exp_id): Path<String>,
) -> Result<Json<Profile>, ApiError> {
    let exp_id = parse_id(&exp_id, "Experience not found")?;
    Ok(Json(services::remove_experience(&state, user_id, exp_id).await?))
}

#[instrument(skip(state, payload))]
pub async fn add_education(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    JsonBody(payload): JsonBody<EducationRequest>,
) -> Result<Json<Profile>, ApiError> {
    Ok(Json(services::add_education(&state, user_id, payload).await?))
}

#[instrument(skip(state))]
pub async fn remove_education(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(edu_id): Path<String>,
) -> Result<Json<Profile>, ApiError> {
    let edu_id = parse_id(&edu_id, "Education not found")?;
    Ok(Json(services::remove_education(&state, user_id, edu_id).await?))
}
