use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use serde_json::json;
use shortestpath_core::{Pathfinder, SearchHandle};
use tracing::{info, info_span, Instrument};

use crate::errors::AppError;
use crate::models::{unpack_path, FindPathRequest, FindPathResponse, SearchCreated, SearchSnapshot, StatsBody};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct Healthz {
    pub status: &'static str,
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(Healthz { status: "ok" }))
}

pub async fn version() -> impl IntoResponse {
    let svc_version = env!("CARGO_PKG_VERSION");
    let core_version = shortestpath_core::version();
    (StatusCode::OK, Json(json!({"service_version": svc_version, "core_version": core_version})))
}

fn build_search(state: &AppState, req: FindPathRequest) -> Result<Pathfinder<shortestpath_core::WorldConfig>, AppError> {
    let start = req.start()?;
    let targets = req.targets()?;
    let settings = req.settings.unwrap_or_default();
    let player = req.player.unwrap_or_default();
    let config = state.world.config(settings, player);
    Ok(Pathfinder::new(config, start, targets)?)
}

/// Runs a search to completion on the blocking pool.
pub async fn find_path(State(state): State<AppState>, Json(req): Json<FindPathRequest>) -> Result<Json<FindPathResponse>, AppError> {
    let span = info_span!("find_path", start = %req.start, targets = req.targets.len());
    async move {
        let pathfinder = build_search(&state, req)?;
        let handle = pathfinder.handle();
        let stats = tokio::task::spawn_blocking(move || pathfinder.run())
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("search task failed: {e}")))?;

        let path = handle.path();
        info!(outcome = ?stats.outcome, nodes = stats.total_checked(), path_len = path.len(), "find_path done");
        Ok(Json(FindPathResponse { path: unpack_path(&path), reached: handle.reached(), stats: StatsBody::from(&stats) }))
    }
    .instrument(span)
    .await
}

pub async fn start_search(
    State(state): State<AppState>,
    Json(req): Json<FindPathRequest>,
) -> Result<(StatusCode, Json<SearchCreated>), AppError> {
    let pathfinder = build_search(&state, req)?;
    let (handle, _join) = pathfinder
        .spawn()
        .map_err(|e| AppError::Internal(anyhow::Error::new(e).context("failed to start search thread")))?;
    let id = state.searches.insert(handle);
    info!(id, "search started");
    Ok((StatusCode::CREATED, Json(SearchCreated { id })))
}

fn snapshot(id: u64, handle: &SearchHandle) -> SearchSnapshot {
    // read done first so a finished search always reports its stats
    let done = handle.is_done();
    SearchSnapshot {
        id,
        done,
        reached: handle.reached(),
        path: unpack_path(&handle.path()),
        stats: handle.stats().as_ref().map(StatsBody::from),
    }
}

pub async fn get_search(State(state): State<AppState>, Path(id): Path<u64>) -> Result<Json<SearchSnapshot>, AppError> {
    let handle = state.searches.get(id).ok_or_else(|| AppError::NotFound(format!("search {id}")))?;
    Ok(Json(snapshot(id, &handle)))
}

pub async fn cancel_search(State(state): State<AppState>, Path(id): Path<u64>) -> Result<StatusCode, AppError> {
    state.searches.remove(id).ok_or_else(|| AppError::NotFound(format!("search {id}")))?;
    info!(id, "search cancelled");
    Ok(StatusCode::NO_CONTENT)
}
