#![allow(dead_code)]

use shortestpath_core::map::CollisionMap;
use shortestpath_core::node::{Candidate, Node};
use shortestpath_core::visited::VisitedTiles;
use shortestpath_core::{PackedPoint, PathfinderConfig, TransportEdge, WildernessTier};
use std::thread;
use std::time::Duration;

pub fn p(x: i32, y: i32) -> PackedPoint {
    PackedPoint::new(x, y, 0).unwrap()
}

/// Delegates everything to `inner` but sleeps before every expansion, so the search runs long
/// enough to be timed out or cancelled.
pub struct Throttled<C> {
    pub inner: C,
    pub delay: Duration,
}

impl<C: PathfinderConfig> PathfinderConfig for Throttled<C> {
    fn map(&self) -> &CollisionMap {
        self.inner.map()
    }
    fn transports(&self, origin: PackedPoint) -> &[TransportEdge] {
        self.inner.transports(origin)
    }
    fn neighbors(&self, node: &Node, visited: &VisitedTiles, out: &mut Vec<Candidate>) {
        thread::sleep(self.delay);
        self.inner.neighbors(node, visited, out);
    }
    fn ignores_collision(&self, p: PackedPoint) -> bool {
        self.inner.ignores_collision(p)
    }
    fn wilderness_tier(&self, p: PackedPoint) -> WildernessTier {
        self.inner.wilderness_tier(p)
    }
    fn is_in_wilderness(&self, p: PackedPoint) -> bool {
        self.inner.is_in_wilderness(p)
    }
    fn avoid_wilderness(&self, from: PackedPoint, to: PackedPoint, target_in_wilderness: bool) -> bool {
        self.inner.avoid_wilderness(from, to, target_in_wilderness)
    }
    fn refresh_teleports(&mut self, at: PackedPoint, tier: WildernessTier) {
        self.inner.refresh_teleports(at, tier)
    }
    fn calculation_cutoff(&self) -> Duration {
        self.inner.calculation_cutoff()
    }
}
