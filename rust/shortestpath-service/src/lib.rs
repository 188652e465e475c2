use std::num::NonZeroUsize;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use shortestpath_core::WorldData;

pub mod config;
pub mod errors;
pub mod jobs;
pub mod models;
pub mod routes;

use crate::jobs::SearchRegistry;

#[derive(Clone)]
pub struct AppState {
    pub world: Arc<WorldData>,
    pub searches: Arc<SearchRegistry>,
}

impl AppState {
    pub fn new(world: WorldData, max_searches: NonZeroUsize) -> Self {
        Self { world: Arc::new(world), searches: Arc::new(SearchRegistry::new(max_searches)) }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(routes::healthz))
        .route("/version", get(routes::version))
        .route("/find_path", post(routes::find_path))
        .route("/searches", post(routes::start_search))
        .route("/searches/:id", get(routes::get_search).delete(routes::cancel_search))
        .with_state(state)
}
