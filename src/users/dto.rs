use serde::{Deserialize, Serialize};

use crate::{
    error::ApiError,
    validation::{is_valid_email, normalize_email, Rules},
};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        Rules::new()
            .required("name", &self.name, "Name can not be empty")
            .check(
                is_valid_email(&normalize_email(&self.email)),
                "email",
                "Not a valid email address",
            )
            .check(
                self.password.chars().count() >= MIN_PASSWORD_LEN,
                "password",
                "Password must be at least 6 characters long",
            )
            .finish()
    }
}

#[derive(Debug, Serialize)]
pub struct MsgResponse {
    pub msg: String,
}
