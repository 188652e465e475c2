use serde::{Deserialize, Serialize};
use shortestpath_core::{PackedPoint, PathfinderSettings, PlayerState, SearchOutcome, SearchStats, WorldPoint};

use crate::errors::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct FindPathRequest {
    pub start: WorldPoint,
    pub targets: Vec<WorldPoint>,
    #[serde(default)]
    pub settings: Option<PathfinderSettings>,
    #[serde(default)]
    pub player: Option<PlayerState>,
}

impl FindPathRequest {
    pub fn start(&self) -> Result<PackedPoint, AppError> {
        pack(self.start)
    }

    pub fn targets(&self) -> Result<Vec<PackedPoint>, AppError> {
        self.targets.iter().copied().map(pack).collect()
    }
}

fn pack(p: WorldPoint) -> Result<PackedPoint, AppError> {
    p.pack().ok_or_else(|| AppError::BadRequest(format!("tile {} is outside the world", p)))
}

pub fn unpack_path(path: &[PackedPoint]) -> Vec<WorldPoint> {
    path.iter().map(|p| WorldPoint::from(*p)).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsBody {
    pub nodes_checked: u64,
    pub transports_checked: u64,
    pub tiles_visited: u64,
    pub elapsed_ms: u64,
    pub outcome: SearchOutcome,
}

impl From<&SearchStats> for StatsBody {
    fn from(s: &SearchStats) -> Self {
        Self {
            nodes_checked: s.nodes_checked,
            transports_checked: s.transports_checked,
            tiles_visited: s.tiles_visited,
            elapsed_ms: s.elapsed.as_millis() as u64,
            outcome: s.outcome,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindPathResponse {
    pub path: Vec<WorldPoint>,
    pub reached: bool,
    pub stats: StatsBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchCreated {
    pub id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSnapshot {
    pub id: u64,
    pub done: bool,
    pub reached: bool,
    pub path: Vec<WorldPoint>,
    pub stats: Option<StatsBody>,
}
