use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{CommentsResponse, LikesResponse, PostResponse, TextRequest},
    repo_types::Post,
    services::{self, POST_NOT_FOUND},
};
use crate::{
    auth::middleware::AuthUser, error::ApiError, extract::JsonBody, state::AppState,
    validation::parse_id,
};

/// Every posts route sits behind the gate, reads included.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/api/posts", get(list_posts).post(create_post))
        .route("/api/posts/:post_id", get(get_post).delete(delete_post))
        .route("/api/posts/like/:post_id", put(like_post))
        .route("/api/posts/unlike/:post_id", put(unlike_post))
        .route("/api/posts/comment/:post_id", post(add_comment))
        .route("/api/posts/comment/:post_id/:comment_id", delete(remove_comment))
}

#[instrument(skip(state))]
pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<Post>>, ApiError> {
    Ok(Json(services::list_posts(&state).await?))
}

#[instrument(skip(state))]
pub async fn get_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Json<Post>, ApiError> {
    let post_id = parse_id(&post_id, POST_NOT_FOUND)?;
    Ok(Json(services::get_post(&state, post_id).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_post(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    JsonBody(payload): JsonBody<TextRequest>,
) -> Result<Json<PostResponse>, ApiError> {
    let post = services::create_post(&state, user_id, payload).await?;
    Ok(Json(PostResponse {
        msg: "Post added successfully",
        post,
    }))
}

#[instrument(skip(state))]
pub async fn delete_post(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(post_id): Path<String>,
) -> Result<Json<PostResponse>, ApiError> {
    let post_id = parse_id(&post_id, POST_NOT_FOUND)?;
    let post = services::delete_post(&state, user_id, post_id).await?;
    Ok(Json(PostResponse {
        msg: "Post deleted successfully",
        post,
    }))
}

#[instrument(skip(state))]
pub async fn like_post(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(post_id): Path<String>,
) -> Result<Json<LikesResponse>, ApiError> {
    let post_id = parse_id(&post_id, POST_NOT_FOUND)?;
    let likes = services::like_post(&state, user_id, post_id).await?;
    Ok(Json(LikesResponse {
        msg: "Post liked successfully",
        likes,
    }))
}

#[instrument(skip(state))]
pub async fn unlike_post(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(post_id): Path<String>,
) -> Result<Json<LikesResponse>, ApiError> {
    let post_id = parse_id(&post_id, POST_NOT_FOUND)?;
    let likes = services::unlike_post(&state, user_id, post_id).await?;
    Ok(Json(LikesResponse {
        msg: "Unliked successfully",
        likes,
    }))
}

#[instrument(skip(state, payload))]
pub async fn add_comment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(post_id): Path<String>,
    JsonBody(payload): JsonBody<TextRequest>,
) -> Result<Json<CommentsResponse>, ApiError> {
    // body errors are reported before the post is looked up
    payload.validate()?;
    let post_id = parse_id(&post_id, POST_NOT_FOUND)?;
    let comments = services::add_comment(&state, user_id, post_id, payload).await?;
    Ok(Json(CommentsResponse {
        msg: "Post commented successfully",
        comments,
    }))
}

#[instrument(skip(state))]
pub async fn remove_comment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((post_id, comment_id)): Path<(String, String)>,
) -> Result<Json<CommentsResponse>, ApiError> {
    let post_id = parse_id(&post_id, POST_NOT_FOUND)?;
    let comment_id = parse_id(&comment_id, "Comment not found")?;
    let comments = services::remove_comment(&state, user_id, post_id, comment_id).await?;
    Ok(Json(CommentsResponse {
        msg: "Comment deleted successfully",
        comments,
    }))
}
