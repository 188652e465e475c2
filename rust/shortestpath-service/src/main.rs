use anyhow::Context;
use shortestpath_core::WorldData;
use shortestpath_service::config::Config;
use shortestpath_service::{build_router, AppState};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Structured logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).json().init();

    let cfg = Config::from_env()?;
    let world = WorldData::open(&cfg.db_path).with_context(|| format!("loading world from {}", cfg.db_path.display()))?;
    let state = AppState::new(world, cfg.max_searches);
    let app = build_router(state);

    let addr = cfg.addr()?;
    tracing::info!(core_version = %shortestpath_core::version(), %addr, db = %cfg.db_path.display(), "starting shortestpath-service");
    let listener = tokio::net::TcpListener::bind(addr).await.context("bind failed")?;
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
