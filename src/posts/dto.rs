use serde::{Deserialize, Serialize};

use super::repo_types::{Comment, Like, Post};
use crate::{error::ApiError, validation::Rules};

/// Body for creating a post or a comment.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextRequest {
    #[serde(default)]
    pub text: String,
}

impl TextRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        Rules::new()
            .required("text", &self.text, "Text required")
            .finish()
    }
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub msg: &'static str,
    pub post: Post,
}

#[derive(Debug, Serialize)]
pub struct LikesResponse {
    pub msg: &'static str,
    pub likes: Vec<Like>,
}

#[derive(Debug, Serialize)]
pub struct CommentsResponse {
    pub msg: &'static str,
    pub comments: Vec<Comment>,
}
