use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub user_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub name: String,
    pub avatar: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A post document. Likes and comments live inside it, newest first, and go
/// away with it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,   // author name at posting time
    pub avatar: String, // author avatar at posting time
    pub text: String,
    pub likes: Vec<Like>,
    pub comments: Vec<Comment>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Post {
    pub fn is_liked_by(&self, user_id: Uuid) -> bool {
        self.likes.iter().any(|l| l.user_id == user_id)
    }

    /// A user likes a post at most once; a second like is an error, not a no-op.
    pub fn like(&mut self, user_id: Uuid) -> Result<(), ApiError> {
        if self.is_liked_by(user_id) {
            return Err(ApiError::AlreadyLiked);
        }
        self.likes.insert(0, Like { user_id });
        Ok(())
    }

    pub fn unlike(&mut self, user_id: Uuid) -> Result<(), ApiError> {
        if !self.is_liked_by(user_id) {
            return Err(ApiError::NotYetLiked);
        }
        self.likes.retain(|l| l.user_id != user_id);
        Ok(())
    }

    pub fn add_comment(&mut self, comment: Comment) {
        self.comments.insert(0, comment);
    }

    pub fn comment(&self, id: Uuid) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == id)
    }

    pub fn remove_comment(&mut self, id: Uuid) -> bool {
        let before = self.comments.len();
        self.comments.retain(|c| c.id != id);
        self.comments.len() != before
    }
}

#[derive(Debug, FromRow)]
pub struct PostRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub avatar: String,
    pub text: String,
    pub likes: Json<Vec<Like>>,
    pub comments: Json<Vec<Comment>>,
    pub created_at: OffsetDateTime,
}

impl From<PostRow> for Post {
    fn from(r: PostRow) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            name: r.name,
            avatar: r.avatar,
            text: r.text,
            likes: r.likes.0,
            comments: r.comments.0,
            created_at: r.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post() -> Post {
        Post {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "A".into(),
            avatar: String::new(),
            text: "hello".into(),
            likes: Vec::new(),
            comments: Vec::new(),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn second_like_fails_and_keeps_set_size() {
        let mut p = post();
        let u = Uuid::new_v4();
        p.like(u).unwrap();
        assert!(matches!(p.like(u), Err(ApiError::AlreadyLiked)));
        assert_eq!(p.likes.len(), 1);
    }

    #[test]
    fn likes_are_newest_first() {
        let mut p = post();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        p.like(a).unwrap();
        p.like(b).unwrap();
        assert_eq!(p.likes, [Like { user_id: b }, Like { user_id: a }]);
    }

    #[test]
    fn unlike_requires_prior_like() {
        let mut p = post();
        let u = Uuid::new_v4();
        assert!(matches!(p.unlike(u), Err(ApiError::NotYetLiked)));
        p.like(u).unwrap();
        p.unlike(u).unwrap();
        assert!(p.likes.is_empty());
    }
}
