use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use super::{
    dto::{
        parse_skills, EducationRequest, ExperienceRequest, OwnerSummary, ProfileRequest,
        ProfileWithOwner,
    },
    repo_types::Profile,
};
use crate::{error::ApiError, state::AppState};

const PROFILE_NOT_FOUND: &str = "Profile not found";

async fn with_owner(state: &AppState, profile: Profile) -> Result<ProfileWithOwner, ApiError> {
    let owner = state.users.find_by_id(profile.user_id).await?;
    Ok(ProfileWithOwner {
        profile,
        user: owner.as_ref().map(OwnerSummary::from),
    })
}

pub async fn list_profiles(state: &AppState) -> Result<Vec<ProfileWithOwner>, ApiError> {
    let profiles = state.profiles.list().await?;
    let mut out = Vec::with_capacity(profiles.len());
    for profile in profiles {
        out.push(with_owner(state, profile).await?);
    }
    Ok(out)
}

/// Two independent reads, profile then owner; not a consistent snapshot.
pub async fn get_profile_with_owner(
    state: &AppState,
    user_id: Uuid,
) -> Result<ProfileWithOwner, ApiError> {
    let profile = state
        .profiles
        .find_by_user(user_id)
        .await?
        .ok_or(ApiError::NotFound(PROFILE_NOT_FOUND))?;
    with_owner(state, profile).await
}

/// Returns the stored profile and whether it was newly created. Updating
/// keeps existing experience and education. The token may outlive the
/// account, so the owner is looked up before anything is written.
pub async fn upsert_profile(
    state: &AppState,
    user_id: Uuid,
    req: ProfileRequest,
) -> Result<(Profile, bool), ApiError> {
    req.validate()?;
    if state.users.find_by_id(user_id).await?.is_none() {
        return Err(ApiError::NotFound("User not found"));
    }
    let existing = state.profiles.find_by_user(user_id).await?;
    let created = existing.is_none();

    let mut profile = existing.unwrap_or_else(|| Profile {
        id: Uuid::new_v4(),
        user_id,
        occupation: String::new(),
        skills: Vec::new(),
        company: None,
        website: None,
        location: None,
        bio: None,
        experience: Vec::new(),
        education: Vec::new(),
        created_at: OffsetDateTime::now_utc(),
    });
    profile.occupation = req.occupation.trim().to_string();
    profile.skills = parse_skills(&req.skills);
    profile.company = req.company;
    profile.website = req.website;
    profile.location = req.location;
    profile.bio = req.bio;

    let saved = state.profiles.save(&profile).await?;
    info!(%user_id, profile_id = %saved.id, created, "profile saved");
    Ok((saved, created))
}

pub async fn delete_profile(state: &AppState, user_id: Uuid) -> Result<Option<Profile>, ApiError> {
    let removed = state.profiles.delete_by_user(user_id).await?;
    info!(%user_id, removed = removed.is_some(), "profile deleted");
    Ok(removed)
}

async fn own_profile(state: &AppState, user_id: Uuid) -> Result<Profile, ApiError> {
    state
        .profiles
        .find_by_user(user_id)
        .await?
        .ok_or(ApiError::NotFound(PROFILE_NOT_FOUND))
}

pub async fn add_experience(
    state: &AppState,
    user_id: Uuid,
    req: ExperienceRequest,
) -> Result<Profile, ApiError> {
    req.validate()?;
    let mut profile = own_profile(state, user_id).await?;
    profile.add_experience(req.into_entry()?);
    Ok(state.profiles.save(&profile).await?)
}

pub async fn remove_experience(
    state: &AppState,
    user_id: Uuid,
    exp_id: Uuid,
) -> Result<Profile, ApiError> {
    let mut profile = own_profile(state, user_id).await?;
    if !profile.remove_experience(exp_id) {
        return Err(ApiError::NotFound("Experience not found"));
    }
    Ok(state.profiles.save(&profile).await?)
}

pub async fn add_education(
    state: &AppState,
    user_id: Uuid,
    req: EducationRequest,
) -> Result<Profile, ApiError> {
    req.validate()?;
    let mut profile = own_profile(state, user_id).await?;
    profile.add_education(req.into_entry()?);
    Ok(state.profiles.save(&profile).await?)
}

pub async fn remove_education(
    state: &AppState,
    user_id: Uuid,
    edu_id: Uuid,
) -> Result<Profile, ApiError> {
    let mut profile = own_profile(state, user_id).await?;
    if !profile.remove_education(edu_id) {
        return Err(ApiError::NotFound("Education not found"));
    }
    Ok(state.profiles.save(&profile).await?)
}
