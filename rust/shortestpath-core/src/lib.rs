pub mod config;
pub mod db;
pub mod error;
pub mod map;
pub mod movement;
pub mod node;
pub mod options;
pub mod pathfinder;
pub mod player;
pub mod point;
pub mod requirements;
pub mod transport;
pub mod visited;
pub mod wilderness;
pub mod world;

pub use config::{PathfinderConfig, WorldConfig};
pub use error::{LoadError, PathfinderError};
pub use map::{CollisionMap, CollisionMapBuilder};
pub use options::PathfinderSettings;
pub use pathfinder::{Pathfinder, SearchHandle, SearchOutcome, SearchStats};
pub use player::PlayerState;
pub use point::{PackedPoint, WorldPoint};
pub use transport::{Transport, TransportCatalog, TransportEdge, TransportKind};
pub use wilderness::WildernessTier;
pub use world::WorldData;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
