use serde::{Deserialize, Serialize};

use crate::{
    error::ApiError,
    users::repo_types::User,
    validation::{is_valid_email, normalize_email, Rules},
};

/// Request body for login.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        Rules::new()
            .check(
                is_valid_email(&normalize_email(&self.email)),
                "email",
                "Not a valid email address",
            )
            .check(!self.password.is_empty(), "password", "Password required")
            .finish()
    }
}

/// Returned by registration and login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// The caller's own record; `User` never serializes its password hash.
#[derive(Debug, Serialize)]
pub struct CurrentUserResponse {
    pub user: User,
}
