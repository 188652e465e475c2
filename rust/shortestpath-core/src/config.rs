//! The collaborator the search consults for moves, transports and policy.

use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::map::CollisionMap;
use crate::node::{Candidate, Node};
use crate::options::PathfinderSettings;
use crate::player::PlayerState;
use crate::point::PackedPoint;
use crate::transport::{Transport, TransportCatalog, TransportEdge, TransportKind};
use crate::visited::VisitedTiles;
use crate::wilderness::{self, WildernessTier};

pub trait PathfinderConfig {
    fn map(&self) -> &CollisionMap;

    /// Transport edges currently usable from `origin`.
    fn transports(&self, origin: PackedPoint) -> &[TransportEdge];

    /// Appends every unvisited move out of `node`: transports first, then ordinary steps.
    fn neighbors(&self, node: &Node, visited: &VisitedTiles, out: &mut Vec<Candidate>) {
        self.map().neighbors(self, node.point(), visited, out);
    }

    fn ignores_collision(&self, _p: PackedPoint) -> bool {
        false
    }

    fn wilderness_tier(&self, p: PackedPoint) -> WildernessTier {
        WildernessTier::of(p)
    }

    fn is_in_wilderness(&self, p: PackedPoint) -> bool {
        wilderness::is_in_wilderness(p)
    }

    /// Whether the edge `from -> to` must be skipped.
    fn avoid_wilderness(&self, from: PackedPoint, to: PackedPoint, target_in_wilderness: bool) -> bool;

    /// Called when the search first reaches a tile of a less restrictive tier; teleports usable
    /// at `tier` become edges out of `at`.
    fn refresh_teleports(&mut self, at: PackedPoint, tier: WildernessTier);

    /// How long the search may go without improving before it gives up.
    fn calculation_cutoff(&self) -> Duration;
}

/// The crossing rule: never step into the wilderness from outside unless a target lies in it.
pub fn crosses_into_wilderness(avoid: bool, from: PackedPoint, to: PackedPoint, target_in_wilderness: bool) -> bool {
    avoid && !target_in_wilderness && !wilderness::is_in_wilderness(from) && wilderness::is_in_wilderness(to)
}

/// [`PathfinderConfig`] over a loaded world, filtered for one player.
pub struct WorldConfig {
    map: Arc<CollisionMap>,
    catalog: Arc<TransportCatalog>,
    settings: PathfinderSettings,
    player: PlayerState,
    edges: FxHashMap<PackedPoint, Vec<TransportEdge>>,
    teleports: Vec<UsableTeleport>,
    // tile teleports are currently attached to, and how many fixed edges it had before
    teleport_origin: Option<(PackedPoint, usize)>,
    ignored: FxHashSet<PackedPoint>,
}

#[derive(Copy, Clone, Debug)]
struct UsableTeleport {
    destination: PackedPoint,
    travel_time: u32,
    kind: TransportKind,
    max_wilderness_level: i32,
}

impl WorldConfig {
    pub fn new(
        map: Arc<CollisionMap>,
        catalog: Arc<TransportCatalog>,
        settings: PathfinderSettings,
        player: PlayerState,
    ) -> Self {
        let mut cfg = Self {
            map,
            catalog,
            settings,
            player,
            edges: FxHashMap::default(),
            teleports: Vec::new(),
            teleport_origin: None,
            ignored: FxHashSet::default(),
        };
        cfg.refresh();
        cfg
    }

    /// Tiles that are always enterable regardless of their collision data.
    pub fn with_ignored_collision<I>(mut self, tiles: I) -> Self
    where
        I: IntoIterator<Item = PackedPoint>,
    {
        self.ignored.extend(tiles);
        self
    }

    pub fn settings(&self) -> &PathfinderSettings {
        &self.settings
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    /// Whether the player may use `t` right now, wilderness aside.
    pub fn is_usable(&self, t: &Transport) -> bool {
        self.settings.allows(t.kind)
            && (!t.members || self.player.members)
            && t.requirements.iter().all(|r| r.is_satisfied(&self.player))
            && t.items.iter().all(|i| i.is_satisfied(&self.player, self.settings.include_bank_items))
    }

    /// Rebuilds the usable transport edges from the catalog for the current settings and player.
    pub fn refresh(&mut self) {
        let mut edges: FxHashMap<PackedPoint, Vec<TransportEdge>> = FxHashMap::default();
        for (&origin, transports) in self.catalog.origins() {
            let usable: Vec<TransportEdge> = transports
                .iter()
                .filter(|t| self.is_usable(t))
                .map(|t| t.edge_from(origin))
                .collect();
            if !usable.is_empty() {
                edges.insert(origin, usable);
            }
        }
        let teleports: Vec<UsableTeleport> = self
            .catalog
            .teleports()
            .iter()
            .filter(|t| self.is_usable(t))
            .map(|t| UsableTeleport {
                destination: t.destination,
                travel_time: t.duration,
                kind: t.kind,
                max_wilderness_level: t.max_wilderness_level,
            })
            .collect();
        debug!(origins = edges.len(), teleports = teleports.len(), "refreshed usable transports");
        self.edges = edges;
        self.teleports = teleports;
        self.teleport_origin = None;
    }

    fn detach_teleports(&mut self) {
        let Some((origin, fixed)) = self.teleport_origin.take() else { return };
        if fixed == 0 {
            self.edges.remove(&origin);
        } else if let Some(list) = self.edges.get_mut(&origin) {
            list.truncate(fixed);
        }
    }
}

impl PathfinderConfig for WorldConfig {
    fn map(&self) -> &CollisionMap {
        &self.map
    }

    fn transports(&self, origin: PackedPoint) -> &[TransportEdge] {
        self.edges.get(&origin).map(Vec::as_slice).unwrap_or(&[])
    }

    fn ignores_collision(&self, p: PackedPoint) -> bool {
        self.ignored.contains(&p)
    }

    fn avoid_wilderness(&self, from: PackedPoint, to: PackedPoint, target_in_wilderness: bool) -> bool {
        crosses_into_wilderness(self.settings.avoid_wilderness, from, to, target_in_wilderness)
    }

    fn refresh_teleports(&mut self, at: PackedPoint, tier: WildernessTier) {
        self.detach_teleports();
        let permitted: Vec<TransportEdge> = self
            .teleports
            .iter()
            .filter(|t| tier.permits(t.max_wilderness_level))
            .map(|t| TransportEdge { origin: Some(at), destination: t.destination, travel_time: t.travel_time, kind: t.kind })
            .collect();
        debug!(%at, ?tier, teleports = permitted.len(), "attached teleports");
        if permitted.is_empty() {
            return;
        }
        let list = self.edges.entry(at).or_default();
        self.teleport_origin = Some((at, list.len()));
        list.extend(permitted);
    }

    fn calculation_cutoff(&self) -> Duration {
        Duration::from_millis(self.settings.calculation_cutoff_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::packed;
    use crate::requirements::{Comparison, ItemRequirement, Requirement};
    use serde_json::json;

    fn world(catalog: TransportCatalog, settings: PathfinderSettings, player: PlayerState) -> WorldConfig {
        let map = CollisionMap::builder().walkable_rect(3190, 3190, 20, 20, 0).build();
        WorldConfig::new(Arc::new(map), Arc::new(catalog), settings, player)
    }

    fn destinations(cfg: &WorldConfig, at: PackedPoint) -> Vec<PackedPoint> {
        cfg.transports(at).iter().map(|e| e.destination).collect()
    }

    #[test]
    fn filters_by_settings_membership_and_requirements() {
        let origin = packed(3200, 3200, 0);
        let catalog = TransportCatalog::new()
            .with(Transport::new(Some(origin), packed(1, 1, 0), TransportKind::FairyRing, 5))
            .with(Transport::new(Some(origin), packed(2, 2, 0), TransportKind::Boat, 5).members_only())
            .with(
                Transport::new(Some(origin), packed(3, 3, 0), TransportKind::AgilityShortcut, 5)
                    .with_requirement(Requirement::new("agility", Comparison::Ge, "60")),
            )
            .with(Transport::new(Some(origin), packed(4, 4, 0), TransportKind::Transport, 1));
        let mut settings = PathfinderSettings::default();
        settings.use_fairy_rings = false;
        let player: PlayerState = serde_json::from_value(json!({ "values": { "agility": 61 } })).unwrap();
        let cfg = world(catalog, settings, player);
        assert_eq!(destinations(&cfg, origin), vec![packed(3, 3, 0), packed(4, 4, 0)]);
    }

    #[test]
    fn bank_items_only_count_when_enabled() {
        let origin = packed(3200, 3200, 0);
        let catalog = Arc::new(TransportCatalog::new().with(
            Transport::new(Some(origin), packed(1, 1, 0), TransportKind::Transport, 1)
                .with_items(ItemRequirement { variants: vec![995], quantity: 30, ..Default::default() }),
        ));
        let map = Arc::new(CollisionMap::builder().walkable(origin).build());
        let player: PlayerState = serde_json::from_value(json!({ "bank": { "995": 100 } })).unwrap();

        let cfg = WorldConfig::new(map.clone(), catalog.clone(), PathfinderSettings::default(), player.clone());
        assert!(cfg.transports(origin).is_empty());

        let settings = PathfinderSettings { include_bank_items: true, ..Default::default() };
        let cfg = WorldConfig::new(map, catalog, settings, player);
        assert_eq!(cfg.transports(origin).len(), 1);
    }

    #[test]
    fn teleports_attach_by_tier_and_move_with_refresh() {
        let a = packed(3200, 3200, 0);
        let b = packed(3201, 3200, 0);
        let catalog = TransportCatalog::new()
            .with(Transport::new(Some(b), packed(9, 9, 0), TransportKind::Transport, 1))
            .with(Transport::new(None, packed(100, 100, 0), TransportKind::TeleportationSpell, 3))
            .with(Transport::new(None, packed(200, 200, 0), TransportKind::TeleportationMinigame, 3).with_max_wilderness_level(30))
            .with(Transport::new(None, packed(300, 300, 0), TransportKind::TeleportationSpell, 3).with_max_wilderness_level(0));
        let mut cfg = world(catalog, PathfinderSettings::default(), PlayerState::default());

        cfg.refresh_teleports(a, WildernessTier::UpTo30);
        assert_eq!(destinations(&cfg, a), vec![packed(200, 200, 0)]);

        cfg.refresh_teleports(b, WildernessTier::Safe);
        assert!(cfg.transports(a).is_empty());
        assert_eq!(destinations(&cfg, b), vec![packed(9, 9, 0), packed(100, 100, 0), packed(200, 200, 0), packed(300, 300, 0)]);

        cfg.refresh_teleports(a, WildernessTier::Deep);
        assert_eq!(destinations(&cfg, b), vec![packed(9, 9, 0)]);
        assert!(cfg.transports(a).is_empty());
    }

    #[test]
    fn crossing_rule() {
        let outside = packed(3100, 3500, 0);
        let inside = packed(3100, 3530, 0);
        assert!(crosses_into_wilderness(true, outside, inside, false));
        assert!(!crosses_into_wilderness(true, outside, inside, true));
        assert!(!crosses_into_wilderness(false, outside, inside, false));
        assert!(!crosses_into_wilderness(true, inside, outside, false));
        assert!(!crosses_into_wilderness(true, inside, inside, false));
    }
}
