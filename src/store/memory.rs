use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::StoreError;
use crate::{
    posts::{repo::PostRepo, repo_types::Post},
    profiles::{repo::ProfileRepo, repo_types::Profile},
    users::{repo::UserRepo, repo_types::User},
};

/// Process-local store with the same document semantics as the Postgres
/// repositories: callers get copies and `save` replaces the whole document.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    profiles: RwLock<Vec<Profile>>,
    posts: RwLock<Vec<Post>>, // insertion order
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn insert(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateEmail);
        }
        users.push(user.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() != before)
    }
}

#[async_trait]
impl ProfileRepo for MemoryStore {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError> {
        let profiles = self.profiles.read().await;
        Ok(profiles.iter().find(|p| p.user_id == user_id).cloned())
    }

    async fn list(&self) -> Result<Vec<Profile>, StoreError> {
        Ok(self.profiles.read().await.clone())
    }

    async fn save(&self, profile: &Profile) -> Result<Profile, StoreError> {
        let mut profiles = self.profiles.write().await;
        match profiles.iter_mut().find(|p| p.user_id == profile.user_id) {
            // the stored id and creation time win, as with ON CONFLICT
            Some(existing) => {
                let (id, created_at) = (existing.id, existing.created_at);
                *existing = Profile {
                    id,
                    created_at,
                    ..profile.clone()
                };
                Ok(existing.clone())
            }
            None => {
                profiles.push(profile.clone());
                Ok(profile.clone())
            }
        }
    }

    async fn delete_by_user(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError> {
        let mut profiles = self.profiles.write().await;
        let idx = profiles.iter().position(|p| p.user_id == user_id);
        Ok(idx.map(|i| profiles.remove(i)))
    }
}

#[async_trait]
impl PostRepo for MemoryStore {
    async fn list(&self) -> Result<Vec<Post>, StoreError> {
        let posts = self.posts.read().await;
        Ok(posts.iter().rev().cloned().collect())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Post>, StoreError> {
        let posts = self.posts.read().await;
        Ok(posts.iter().find(|p| p.id == id).cloned())
    }

    async fn insert(&self, post: &Post) -> Result<(), StoreError> {
        self.posts.write().await.push(post.clone());
        Ok(())
    }

    async fn save(&self, post: &Post) -> Result<bool, StoreError> {
        let mut posts = self.posts.write().await;
        let Some(existing) = posts.iter_mut().find(|p| p.id == post.id) else {
            return Ok(false);
        };
        existing.text = post.text.clone();
        existing.likes = post.likes.clone();
        existing.comments = post.comments.clone();
        Ok(true)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut posts = self.posts.write().await;
        let before = posts.len();
        posts.retain(|p| p.id != id);
        Ok(posts.len() != before)
    }
}
