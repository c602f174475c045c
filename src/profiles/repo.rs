use async_trait::async_trait;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use super::repo_types::{Profile, ProfileRow};
use crate::store::StoreError;

#[async_trait]
pub trait ProfileRepo: Send + Sync {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError>;
    async fn list(&self) -> Result<Vec<Profile>, StoreError>;
    /// Writes the whole document, keyed by `user_id`. Last write wins.
    async fn save(&self, profile: &Profile) -> Result<Profile, StoreError>;
    async fn delete_by_user(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError>;
}

pub struct PgProfileRepo {
    db: PgPool,
}

impl PgProfileRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProfileRepo for PgProfileRepo {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, user_id, occupation, skills, company, website, location, bio,
                   experience, education, created_at
            FROM profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(Profile::from))
    }

    async fn list(&self) -> Result<Vec<Profile>, StoreError> {
        let rows = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, user_id, occupation, skills, company, website, location, bio,
                   experience, education, created_at
            FROM profiles
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(Profile::from).collect())
    }

    async fn save(&self, profile: &Profile) -> Result<Profile, StoreError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            INSERT INTO profiles (id, user_id, occupation, skills, company, website, location,
                                  bio, experience, education, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (user_id) DO UPDATE
               SET occupation = EXCLUDED.occupation,
                   skills     = EXCLUDED.skills,
                   company    = EXCLUDED.company,
                   website    = EXCLUDED.website,
                   location   = EXCLUDED.location,
                   bio        = EXCLUDED.bio,
                   experience = EXCLUDED.experience,
                   education  = EXCLUDED.education
            RETURNING id, user_id, occupation, skills, company, website, location, bio,
                      experience, education, created_at
            "#,
        )
        .bind(profile.id)
        .bind(profile.user_id)
        .bind(&profile.occupation)
        .bind(&profile.skills)
        .bind(&profile.company)
        .bind(&profile.website)
        .bind(&profile.location)
        .bind(&profile.bio)
        .bind(Json(&profile.experience))
        .bind(Json(&profile.education))
        .bind(profile.created_at)
        .fetch_one(&self.db)
        .await?;
        Ok(row.into())
    }

    async fn delete_by_user(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            DELETE FROM profiles
            WHERE user_id = $1
            RETURNING id, user_id, occupation, skills, company, website, location, bio,
                      experience, education, created_at
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(Profile::from))
    }
}
