use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use tracing::error;

use crate::store::StoreError;

/// One entry of an `{errors: [...]}` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
}

impl FieldError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            param: None,
        }
    }

    pub fn for_param(param: &str, msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            param: Some(param.to_string()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request validation failed")]
    Validation(Vec<FieldError>),
    #[error("token required")]
    MissingToken,
    #[error("invalid token")]
    InvalidToken,
    #[error("forbidden: {0}")]
    Forbidden(&'static str),
    #[error("not found: {0}")]
    NotFound(&'static str),
    #[error("email already exists")]
    DuplicateEmail,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("post already liked")]
    AlreadyLiked,
    #[error("post not yet liked")]
    NotYetLiked,
    #[error("store failure: {0}")]
    Store(StoreError),
    #[error("internal failure: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(vec![FieldError::new(msg)])
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::DuplicateEmail
            | Self::InvalidCredentials
            | Self::AlreadyLiked
            | Self::NotYetLiked => StatusCode::BAD_REQUEST,
            Self::MissingToken | Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => Self::DuplicateEmail,
            other => Self::Store(other),
        }
    }
}

fn errors_body(msg: &str) -> serde_json::Value {
    json!({ "errors": [FieldError::new(msg)] })
}

fn msg_body(msg: &str) -> serde_json::Value {
    json!({ "msg": msg })
}

// Input and credential problems answer with an `errors` array, everything
// else with a single `msg`.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Validation(errors) => json!({ "errors": errors }),
            Self::DuplicateEmail => errors_body("Email already exists"),
            Self::InvalidCredentials => errors_body("Invalid credentials"),
            Self::MissingToken => msg_body("Token required"),
            Self::InvalidToken => msg_body("Invalid token"),
            Self::Forbidden(msg) | Self::NotFound(msg) => msg_body(msg),
            Self::AlreadyLiked => msg_body("Post already been liked"),
            Self::NotYetLiked => msg_body("Post not yet been liked"),
            Self::Store(_) | Self::Internal(_) => {
                error!(error = %self, "request failed");
                errors_body("Server Error")
            }
        };
        (status, Json(body)).into_response()
    }
}
