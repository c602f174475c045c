//! Ownership rules for mutations on posts and their comments.
//!
//! Handlers resolve the target first (404 when it does not exist) and only
//! then consult these checks (403 on mismatch).

use tracing::warn;
use uuid::Uuid;

use crate::error::ApiError;

pub fn ensure_owner(caller: Uuid, owner: Uuid, denied: &'static str) -> Result<(), ApiError> {
    if caller == owner {
        Ok(())
    } else {
        warn!(%caller, %owner, "ownership check failed");
        Err(ApiError::Forbidden(denied))
    }
}

/// A comment may be removed by whoever wrote it or by the author of the post
/// it sits under.
pub fn ensure_can_remove_comment(
    caller: Uuid,
    comment_author: Uuid,
    post_author: Uuid,
) -> Result<(), ApiError> {
    if caller == post_author {
        return Ok(());
    }
    ensure_owner(caller, comment_author, "User not authorized")
}
