use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use super::{
    dto::TextRequest,
    repo_types::{Comment, Like, Post},
};
use crate::{
    auth::policy::{ensure_can_remove_comment, ensure_owner},
    error::ApiError,
    state::AppState,
    users::repo_types::User,
};

pub(crate) const POST_NOT_FOUND: &str = "Post not found";

async fn load(state: &AppState, post_id: Uuid) -> Result<Post, ApiError> {
    state
        .posts
        .find(post_id)
        .await?
        .ok_or(ApiError::NotFound(POST_NOT_FOUND))
}

async fn author(state: &AppState, user_id: Uuid) -> Result<User, ApiError> {
    state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or(ApiError::NotFound("User not found"))
}

/// Writes back a loaded post; a post removed since it was loaded is not found.
async fn persist(state: &AppState, post: &Post) -> Result<(), ApiError> {
    if state.posts.save(post).await? {
        Ok(())
    } else {
        Err(ApiError::NotFound(POST_NOT_FOUND))
    }
}

pub async fn list_posts(state: &AppState) -> Result<Vec<Post>, ApiError> {
    Ok(state.posts.list().await?)
}

pub async fn get_post(state: &AppState, post_id: Uuid) -> Result<Post, ApiError> {
    load(state, post_id).await
}

pub async fn create_post(
    state: &AppState,
    user_id: Uuid,
    req: TextRequest,
) -> Result<Post, ApiError> {
    req.validate()?;
    let user = author(state, user_id).await?;
    let post = Post {
        id: Uuid::new_v4(),
        user_id,
        name: user.name,
        avatar: user.avatar,
        text: req.text,
        likes: Vec::new(),
        comments: Vec::new(),
        created_at: OffsetDateTime::now_utc(),
    };
    state.posts.insert(&post).await?;
    info!(%user_id, post_id = %post.id, "post created");
    Ok(post)
}

/// Only the author may delete; comments go with the post.
pub async fn delete_post(state: &AppState, user_id: Uuid, post_id: Uuid) -> Result<Post, ApiError> {
    let post = load(state, post_id).await?;
    ensure_owner(user_id, post.user_id, "Not the author of the post")?;
    if !state.posts.delete(post_id).await? {
        return Err(ApiError::NotFound(POST_NOT_FOUND));
    }
    info!(%user_id, %post_id, "post deleted");
    Ok(post)
}

pub async fn like_post(
    state: &AppState,
    user_id: Uuid,
    post_id: Uuid,
) -> Result<Vec<Like>, ApiError> {
    let mut post = load(state, post_id).await?;
    post.like(user_id)?;
    persist(state, &post).await?;
    Ok(post.likes)
}

pub async fn unlike_post(
    state: &AppState,
    user_id: Uuid,
    post_id: Uuid,
) -> Result<Vec<Like>, ApiError> {
    let mut post = load(state, post_id).await?;
    post.unlike(user_id)?;
    persist(state, &post).await?;
    Ok(post.likes)
}

pub async fn add_comment(
    state: &AppState,
    user_id: Uuid,
    post_id: Uuid,
    req: TextRequest,
) -> Result<Vec<Comment>, ApiError> {
    req.validate()?;
    let mut post = load(state, post_id).await?;
    let user = author(state, user_id).await?;
    post.add_comment(Comment {
        id: Uuid::new_v4(),
        user_id,
        text: req.text,
        name: user.name,
        avatar: user.avatar,
        created_at: OffsetDateTime::now_utc(),
    });
    persist(state, &post).await?;
    Ok(post.comments)
}

pub async fn remove_comment(
    state: &AppState,
    user_id: Uuid,
    post_id: Uuid,
    comment_id: Uuid,
) -> Result<Vec<Comment>, ApiError> {
    let mut post = load(state, post_id).await?;
    let comment_author = post
        .comment(comment_id)
        .map(|c| c.user_id)
        .ok_or(ApiError::NotFound("Comment not found"))?;
    ensure_can_remove_comment(user_id, comment_author, post.user_id)?;
    post.remove_comment(comment_id);
    persist(state, &post).await?;
    Ok(post.comments)
}
