use async_trait::async_trait;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use super::repo_types::{Post, PostRow};
use crate::store::StoreError;

#[async_trait]
pub trait PostRepo: Send + Sync {
    /// Newest first.
    async fn list(&self) -> Result<Vec<Post>, StoreError>;
    async fn find(&self, id: Uuid) -> Result<Option<Post>, StoreError>;
    async fn insert(&self, post: &Post) -> Result<(), StoreError>;
    /// Overwrites text, likes and comments. No version check: last write wins.
    /// `false` when the post no longer exists.
    async fn save(&self, post: &Post) -> Result<bool, StoreError>;
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

pub struct PgPostRepo {
    db: PgPool,
}

impl PgPostRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PostRepo for PgPostRepo {
    async fn list(&self) -> Result<Vec<Post>, StoreError> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, user_id, name, avatar, text, likes, comments, created_at
            FROM posts
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Post>, StoreError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, user_id, name, avatar, text, likes, comments, created_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(Post::from))
    }

    async fn insert(&self, post: &Post) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, user_id, name, avatar, text, likes, comments, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(post.id)
        .bind(post.user_id)
        .bind(&post.name)
        .bind(&post.avatar)
        .bind(&post.text)
        .bind(Json(&post.likes))
        .bind(Json(&post.comments))
        .bind(post.created_at)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn save(&self, post: &Post) -> Result<bool, StoreError> {
        let res = sqlx::query(
            r#"
            UPDATE posts
               SET text = $2, likes = $3, comments = $4
             WHERE id = $1
            "#,
        )
        .bind(post.id)
        .bind(&post.text)
        .bind(Json(&post.likes))
        .bind(Json(&post.comments))
        .execute(&self.db)
        .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let res = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
