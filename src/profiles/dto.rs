use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use super::repo_types::{Education, Experience, Profile};
use crate::{error::ApiError, users::repo_types::User, validation::Rules};

/// Create-or-update body. `skills` is a comma separated list.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileRequest {
    #[serde(default)]
    pub occupation: String,
    #[serde(default)]
    pub skills: String,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
}

impl ProfileRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        Rules::new()
            .required("occupation", &self.occupation, "Occupation required")
            .check(!parse_skills(&self.skills).is_empty(), "skills", "Skills required")
            .finish()
    }
}

pub fn parse_skills(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExperienceRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    pub location: Option<String>,
    pub from: Option<Date>,
    pub to: Option<Date>,
    #[serde(default)]
    pub current: bool,
    pub description: Option<String>,
}

impl ExperienceRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        Rules::new()
            .required("title", &self.title, "Title is required")
            .required("company", &self.company, "Company is required")
            .present("from", &self.from, "From date is required")
            .check(dates_in_order(self.from, self.to), "to", "To date must not be before from date")
            .finish()
    }

    /// Call after [`validate`](Self::validate).
    pub fn into_entry(self) -> Result<Experience, ApiError> {
        let from = self.from.ok_or_else(|| ApiError::validation("From date is required"))?;
        Ok(Experience {
            id: Uuid::new_v4(),
            title: self.title.trim().to_string(),
            company: self.company.trim().to_string(),
            location: self.location,
            from,
            to: if self.current { None } else { self.to },
            current: self.current,
            description: self.description,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EducationRequest {
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub field_of_study: String,
    pub from: Option<Date>,
    pub to: Option<Date>,
    #[serde(default)]
    pub current: bool,
    pub description: Option<String>,
}

impl EducationRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        Rules::new()
            .required("school", &self.school, "School is required")
            .required("degree", &self.degree, "Degree is required")
            .required("field_of_study", &self.field_of_study, "Field of study is required")
            .present("from", &self.from, "From date is required")
            .check(dates_in_order(self.from, self.to), "to", "To date must not be before from date")
            .finish()
    }

    pub fn into_entry(self) -> Result<Education, ApiError> {
        let from = self.from.ok_or_else(|| ApiError::validation("From date is required"))?;
        Ok(Education {
            id: Uuid::new_v4(),
            school: self.school.trim().to_string(),
            degree: self.degree.trim().to_string(),
            field_of_study: self.field_of_study.trim().to_string(),
            from,
            to: if self.current { None } else { self.to },
            current: self.current,
            description: self.description,
        })
    }
}

fn dates_in_order(from: Option<Date>, to: Option<Date>) -> bool {
    match (from, to) {
        (Some(from), Some(to)) => to >= from,
        _ => true,
    }
}

/// Public part of the owning user attached to a profile.
#[derive(Debug, Clone, Serialize)]
pub struct OwnerSummary {
    pub id: Uuid,
    pub name: String,
    pub avatar: String,
}

impl From<&User> for OwnerSummary {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            name: u.name.clone(),
            avatar: u.avatar.clone(),
        }
    }
}

/// A profile joined with its owner. `user` is `null` when the owner vanished
/// between the two reads.
#[derive(Debug, Serialize)]
pub struct ProfileWithOwner {
    #[serde(flatten)]
    pub profile: Profile,
    pub user: Option<OwnerSummary>,
}

#[derive(Debug, Serialize)]
pub struct ProfileSavedResponse {
    pub msg: &'static str,
    pub profile: Profile,
}

#[derive(Debug, Serialize)]
pub struct ProfileDeletedResponse {
    pub msg: &'static str,
    pub profile: Option<Profile>,
}
