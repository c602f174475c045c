use std::{net::SocketAddr, str::FromStr};

use anyhow::Context;

pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 60 * 60;
pub const DEFAULT_AVATAR_URL_TEMPLATE: &str =
    "https://www.gravatar.com/avatar/{hash}?s=200&r=pg&d=mm";

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_seconds: i64,
}

/// Process-wide settings, read once at startup and shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub jwt: JwtConfig,
    pub host: String,
    pub port: u16,
    pub cors_origin: String,
    /// `{hash}` is replaced with the md5 of the normalized email.
    pub avatar_url_template: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(get: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = get("JWT_SECRET")
            .filter(|s| !s.trim().is_empty())
            .context("JWT_SECRET must be set")?;
        let ttl_seconds = parse_or(&get, "JWT_TTL_SECONDS", DEFAULT_TOKEN_TTL_SECONDS)?;
        anyhow::ensure!(ttl_seconds > 0, "JWT_TTL_SECONDS must be positive");

        Ok(Self {
            database_url: get("DATABASE_URL").filter(|s| !s.trim().is_empty()),
            db_max_connections: parse_or(&get, "DB_MAX_CONNECTIONS", 10)?,
            jwt: JwtConfig {
                secret,
                ttl_seconds,
            },
            host: get("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(&get, "APP_PORT", 3002)?,
            cors_origin: get("CORS_ORIGIN").unwrap_or_else(|| "http://localhost:3000".into()),
            avatar_url_template: get("AVATAR_URL_TEMPLATE")
                .unwrap_or_else(|| DEFAULT_AVATAR_URL_TEMPLATE.into()),
        })
    }

    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}

fn parse_or<F, T>(get: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        None => Ok(default),
    }
}
