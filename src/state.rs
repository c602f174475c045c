use std::sync::Arc;

use sqlx::PgPool;
use tracing::warn;

use crate::{
    auth::jwt::JwtKeys,
    config::AppConfig,
    db,
    posts::repo::{PgPostRepo, PostRepo},
    profiles::repo::{PgProfileRepo, ProfileRepo},
    store::MemoryStore,
    users::repo::{PgUserRepo, UserRepo},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub keys: Arc<JwtKeys>,
    pub users: Arc<dyn UserRepo>,
    pub profiles: Arc<dyn ProfileRepo>,
    pub posts: Arc<dyn PostRepo>,
}

impl AppState {
    /// Postgres when `DATABASE_URL` is set, otherwise the in-memory store.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        match config.database_url.clone() {
            Some(url) => {
                let pool = db::connect(&url, config.db_max_connections).await?;
                Ok(Self::with_postgres(config, pool))
            }
            None => {
                warn!("DATABASE_URL not set; using the in-memory store, data is lost on exit");
                Ok(Self::in_memory(config))
            }
        }
    }

    pub fn with_postgres(config: AppConfig, pool: PgPool) -> Self {
        Self::from_parts(
            config,
            Arc::new(PgUserRepo::new(pool.clone())),
            Arc::new(PgProfileRepo::new(pool.clone())),
            Arc::new(PgPostRepo::new(pool)),
        )
    }

    pub fn in_memory(config: AppConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::from_parts(config, store.clone(), store.clone(), store)
    }

    pub fn from_parts(
        config: AppConfig,
        users: Arc<dyn UserRepo>,
        profiles: Arc<dyn ProfileRepo>,
        posts: Arc<dyn PostRepo>,
    ) -> Self {
        let keys = Arc::new(JwtKeys::new(&config.jwt));
        Self {
            config: Arc::new(config),
            keys,
            users,
            profiles,
            posts,
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::config::{JwtConfig, DEFAULT_AVATAR_URL_TEMPLATE};

        Self::in_memory(AppConfig {
            database_url: None,
            db_max_connections: 1,
            jwt: JwtConfig {
                secret: "test-secret".into(),
                ttl_seconds: 3600,
            },
            host: "127.0.0.1".into(),
            port: 0,
            cors_origin: "http://localhost:3000".into(),
            avatar_url_template: DEFAULT_AVATAR_URL_TEMPLATE.into(),
        })
    }
}
