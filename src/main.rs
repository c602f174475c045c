mod app;
mod auth;
mod config;
mod db;
mod error;
mod extract;
mod posts;
mod profiles;
mod state;
mod store;
mod users;
mod validation;

#[cfg(test)]
mod testing;

use tracing_subscriber::EnvFilter;

use crate::{app::build_app, config::AppConfig, state::AppState};

const DEFAULT_LOG_FILTER: &str = "devconnector=debug,axum=info,tower_http=info";

/// `RUST_LOG` overrides the default filter; `LOG_FORMAT=json` emits JSON lines.
fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => builder.json().with_target(false).init(),
        _ => builder.init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    let config = AppConfig::from_env()?;
    let addr = config.bind_addr()?;
    let state = AppState::init(config).await?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "devconnector api listening");
    axum::serve(listener, build_app(state)).await?;

    Ok(())
}
