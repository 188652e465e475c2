use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::config::WorldConfig;
use crate::db::Database;
use crate::error::LoadError;
use crate::map::CollisionMap;
use crate::options::PathfinderSettings;
use crate::player::PlayerState;
use crate::transport::TransportCatalog;

/// Static world data shared by every search: the collision map and all known transports.
#[derive(Clone, Debug)]
pub struct WorldData {
    pub map: Arc<CollisionMap>,
    pub catalog: Arc<TransportCatalog>,
}

impl WorldData {
    pub fn new(map: CollisionMap, catalog: TransportCatalog) -> Self {
        Self { map: Arc::new(map), catalog: Arc::new(catalog) }
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let db = Database::open_read_only(path)?;
        Self::load(&db)
    }

    pub fn load(db: &Database) -> Result<Self, LoadError> {
        let t0 = Instant::now();
        let map = CollisionMap::from_database(db)?;
        let catalog = TransportCatalog::from_database(db)?;
        info!(
            tiles = map.tile_count(),
            transports = catalog.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "world loaded"
        );
        Ok(Self::new(map, catalog))
    }

    /// A search configuration for one player.
    pub fn config(&self, settings: PathfinderSettings, player: PlayerState) -> WorldConfig {
        WorldConfig::new(Arc::clone(&self.map), Arc::clone(&self.catalog), settings, player)
    }
}
