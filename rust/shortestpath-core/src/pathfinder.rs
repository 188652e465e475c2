//! Anytime breadth-first search with a priority lane for transports.
//!
//! Ordinary steps go through a FIFO boundary (each level costs exactly one more than the last);
//! transport nodes wait in a min-queue keyed on accumulated cost and are taken only while they are
//! strictly cheaper than the boundary head. The closest tile seen so far is published after every
//! improvement, so [`SearchHandle::path`] always has an answer, and the search gives up once it
//! has gone a full cutoff without improving.

use arc_swap::ArcSwapOption;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::collections::{BinaryHeap, VecDeque};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

use crate::config::PathfinderConfig;
use crate::error::PathfinderError;
use crate::node::{Candidate, EdgeKind, Node, PendingNode};
use crate::point::PackedPoint;
use crate::visited::VisitedTiles;
use crate::wilderness::WildernessTier;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchOutcome {
    /// The search stopped on a target tile.
    Reached,
    /// Both queues ran dry without reaching a target.
    Exhausted,
    /// A full cutoff passed without any improvement.
    TimedOut,
    Cancelled,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SearchStats {
    /// Ordinary tiles scheduled, the start tile included.
    pub nodes_checked: u64,
    /// Transport destinations scheduled.
    pub transports_checked: u64,
    /// Tiles marked visited when the loop exited.
    pub tiles_visited: u64,
    pub elapsed: Duration,
    pub outcome: SearchOutcome,
}

impl SearchStats {
    pub fn total_checked(&self) -> u64 {
        self.nodes_checked + self.transports_checked
    }
}

struct CachedPath {
    node: Arc<Node>,
    tiles: Vec<PackedPoint>,
}

/// State visible to other threads while the search runs.
struct Shared {
    cancelled: AtomicBool,
    done: AtomicBool,
    best: ArcSwapOption<Node>,
    path_dirty: AtomicBool,
    path_cache: ArcSwapOption<CachedPath>,
    stats: OnceLock<SearchStats>,
}

impl Shared {
    fn new() -> Self {
        Self {
            cancelled: AtomicBool::new(false),
            done: AtomicBool::new(false),
            best: ArcSwapOption::empty(),
            path_dirty: AtomicBool::new(false),
            path_cache: ArcSwapOption::empty(),
            stats: OnceLock::new(),
        }
    }

    fn publish(&self, node: Arc<Node>) {
        self.best.store(Some(node));
        self.path_dirty.store(true, Ordering::Release);
    }

    fn path(&self) -> Vec<PackedPoint> {
        let Some(best) = self.best.load_full() else { return Vec::new() };
        if !self.path_dirty.load(Ordering::Acquire) {
            let cached = self.path_cache.load();
            if let Some(cached) = &*cached {
                if Arc::ptr_eq(&cached.node, &best) {
                    return cached.tiles.clone();
                }
            }
        }
        self.path_dirty.store(false, Ordering::Release);
        let tiles = best.path();
        self.path_cache.store(Some(Arc::new(CachedPath { node: best, tiles: tiles.clone() })));
        tiles
    }
}

/// Cheap, cloneable view of a running or finished search.
#[derive(Clone)]
pub struct SearchHandle {
    shared: Arc<Shared>,
}

impl SearchHandle {
    /// Asks the search to stop; observed at the top of the next iteration.
    pub fn cancel(&self) {
        self.shared.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.shared.cancelled.load(Ordering::Acquire)
    }

    /// True once the loop has exited and its working state has been released.
    pub fn is_done(&self) -> bool {
        self.shared.done.load(Ordering::Acquire)
    }

    /// Tiles from the start to the closest tile found so far; empty before the first improvement.
    pub fn path(&self) -> Vec<PackedPoint> {
        self.shared.path()
    }

    /// Only available once the run has both started and ended.
    pub fn stats(&self) -> Option<SearchStats> {
        self.shared.stats.get().cloned()
    }

    pub fn reached(&self) -> bool {
        self.shared.stats.get().map_or(false, |s| s.outcome == SearchOutcome::Reached)
    }
}

impl std::fmt::Debug for SearchHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchHandle")
            .field("done", &self.is_done())
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Best-so-far tracker. The heuristic is Chebyshev plus Manhattan distance to the nearest target;
/// ties are broken by the plain distance.
#[derive(Debug)]
struct Closest {
    distance: i32,
    heuristic: i32,
}

impl Closest {
    fn new() -> Self {
        Self { distance: i32::MAX, heuristic: i32::MAX }
    }

    fn offer(&mut self, p: PackedPoint, targets: &[PackedPoint]) -> bool {
        let mut improved = false;
        for &t in targets {
            let distance = p.distance(t);
            let heuristic = distance + p.diagonal_distance(t);
            if heuristic < self.heuristic || (heuristic <= self.heuristic && distance < self.distance) {
                self.heuristic = heuristic;
                self.distance = distance;
                improved = true;
            }
        }
        improved
    }
}

/// A single-use search. Build it, keep a [`handle`](Self::handle), then [`run`](Self::run) it
/// here or [`spawn`](Self::spawn) it on its own thread.
pub struct Pathfinder<C> {
    config: C,
    start: PackedPoint,
    targets: Vec<PackedPoint>,
    target_set: FxHashSet<PackedPoint>,
    target_in_wilderness: bool,
    shared: Arc<Shared>,
}

impl<C: PathfinderConfig> Pathfinder<C> {
    pub fn new<I>(config: C, start: PackedPoint, targets: I) -> Result<Self, PathfinderError>
    where
        I: IntoIterator<Item = PackedPoint>,
    {
        let mut target_set = FxHashSet::default();
        let targets: Vec<PackedPoint> = targets.into_iter().filter(|t| target_set.insert(*t)).collect();
        if targets.is_empty() {
            return Err(PathfinderError::NoTargets);
        }
        let target_in_wilderness = targets.iter().any(|t| config.is_in_wilderness(*t));
        Ok(Self { config, start, targets, target_set, target_in_wilderness, shared: Arc::new(Shared::new()) })
    }

    pub fn handle(&self) -> SearchHandle {
        SearchHandle { shared: Arc::clone(&self.shared) }
    }

    pub fn start(&self) -> PackedPoint {
        self.start
    }

    pub fn targets(&self) -> &[PackedPoint] {
        &self.targets
    }

    pub fn cancel(&self) {
        self.shared.cancelled.store(true, Ordering::Release);
    }

    pub fn is_done(&self) -> bool {
        self.shared.done.load(Ordering::Acquire)
    }

    pub fn path(&self) -> Vec<PackedPoint> {
        self.shared.path()
    }

    pub fn stats(&self) -> Option<SearchStats> {
        self.shared.stats.get().cloned()
    }

    /// Runs the search to completion on the calling thread.
    pub fn run(mut self) -> SearchStats {
        let started = Instant::now();
        let cutoff = self.config.calculation_cutoff();
        let mut deadline = started + cutoff;
        debug!(start = %self.start, targets = self.targets.len(), cutoff_ms = cutoff.as_millis() as u64, "search started");

        let mut visited = VisitedTiles::new(self.config.map().extent());
        let mut boundary: VecDeque<Arc<Node>> = VecDeque::with_capacity(4096);
        let mut pending: BinaryHeap<PendingNode> = BinaryHeap::with_capacity(256);
        let mut candidates: Vec<Candidate> = Vec::with_capacity(16);
        let mut closest = Closest::new();
        let mut tier = WildernessTier::Deep;
        let mut seq = 0u64;
        let mut nodes_checked = 0u64;
        let mut transports_checked = 0u64;

        if visited.set(self.start) {
            nodes_checked += 1;
        }
        boundary.push_back(Node::root(self.start));

        let outcome = loop {
            if self.shared.cancelled.load(Ordering::Acquire) {
                break SearchOutcome::Cancelled;
            }

            let take_pending = match (boundary.front(), pending.peek()) {
                (_, None) => false,
                (None, Some(_)) => true,
                (Some(head), Some(p)) => p.node.cost() < head.cost(),
            };
            let next = if take_pending { pending.pop().map(|p| p.node) } else { boundary.pop_front() };
            let Some(node) = next else { break SearchOutcome::Exhausted };
            let at = node.point();

            if tier > WildernessTier::Safe {
                let here = self.config.wilderness_tier(at);
                if here < tier {
                    debug!(%at, from = ?tier, to = ?here, "wilderness tier relaxed");
                    tier = here;
                    self.config.refresh_teleports(at, here);
                }
            }

            if self.target_set.contains(&at) {
                self.shared.publish(node);
                break SearchOutcome::Reached;
            }

            if closest.offer(at, &self.targets) {
                trace!(%at, heuristic = closest.heuristic, distance = closest.distance, "closer tile");
                self.shared.publish(Arc::clone(&node));
                deadline = Instant::now() + cutoff;
            }

            if Instant::now() > deadline {
                break SearchOutcome::TimedOut;
            }

            candidates.clear();
            self.config.neighbors(&node, &visited, &mut candidates);
            for candidate in candidates.drain(..) {
                if self.config.avoid_wilderness(at, candidate.point, self.target_in_wilderness) {
                    continue;
                }
                if !visited.set(candidate.point) {
                    continue;
                }
                let child = Node::child(&node, candidate);
                match candidate.kind {
                    EdgeKind::Walk => {
                        nodes_checked += 1;
                        boundary.push_back(child);
                    }
                    EdgeKind::Transport { .. } => {
                        transports_checked += 1;
                        pending.push(PendingNode { node: child, seq });
                        seq += 1;
                    }
                }
            }
        };

        let tiles_visited = visited.len() as u64;
        boundary.clear();
        pending.clear();
        visited.clear();

        let stats = SearchStats { nodes_checked, transports_checked, tiles_visited, elapsed: started.elapsed(), outcome };
        debug!(
            nodes_checked,
            transports_checked,
            tiles_visited,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            ?outcome,
            "search finished"
        );
        let _ = self.shared.stats.set(stats.clone());
        self.shared.done.store(true, Ordering::Release);
        stats
    }
}

impl<C: PathfinderConfig + Send + 'static> Pathfinder<C> {
    /// Runs the search on a dedicated thread.
    pub fn spawn(self) -> io::Result<(SearchHandle, JoinHandle<SearchStats>)> {
        let handle = self.handle();
        let join = thread::Builder::new().name("pathfinder".into()).spawn(move || self.run())?;
        Ok((handle, join))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::crosses_into_wilderness;
    use crate::map::CollisionMap;
    use crate::point::packed;
    use crate::transport::TransportEdge;

    struct Open {
        map: CollisionMap,
        cutoff: Duration,
    }

    impl PathfinderConfig for Open {
        fn map(&self) -> &CollisionMap {
            &self.map
        }
        fn transports(&self, _origin: PackedPoint) -> &[TransportEdge] {
            &[]
        }
        fn avoid_wilderness(&self, from: PackedPoint, to: PackedPoint, target_in_wilderness: bool) -> bool {
            crosses_into_wilderness(true, from, to, target_in_wilderness)
        }
        fn refresh_teleports(&mut self, _at: PackedPoint, _tier: WildernessTier) {}
        fn calculation_cutoff(&self) -> Duration {
            self.cutoff
        }
    }

    fn corridor() -> Open {
        Open { map: CollisionMap::builder().walkable_rect(3200, 3200, 11, 1, 0).build(), cutoff: Duration::from_secs(5) }
    }

    #[test]
    fn empty_targets_fail_fast() {
        let err = Pathfinder::new(corridor(), packed(3200, 3200, 0), Vec::new()).err();
        assert!(matches!(err, Some(PathfinderError::NoTargets)));
    }

    #[test]
    fn closest_tracker_is_monotonic() {
        let targets = [packed(10, 10, 0)];
        let mut c = Closest::new();
        assert!(c.offer(packed(0, 0, 0), &targets));
        let h0 = c.heuristic;
        assert!(c.offer(packed(5, 5, 0), &targets));
        assert!(c.heuristic < h0);
        // farther away never improves
        assert!(!c.offer(packed(0, 1, 0), &targets));
        assert!(c.offer(packed(7, 7, 0), &targets));
        assert_eq!((c.distance, c.heuristic), (3, 9));
        assert!(!c.offer(packed(7, 7, 0), &targets));
    }

    #[test]
    fn corridor_walk_counts_every_tile() {
        let pf = Pathfinder::new(corridor(), packed(3200, 3200, 0), [packed(3210, 3200, 0)]).unwrap();
        let handle = pf.handle();
        assert!(handle.path().is_empty());
        assert!(handle.stats().is_none());
        let stats = pf.run();
        assert_eq!(stats.outcome, SearchOutcome::Reached);
        assert_eq!(stats.nodes_checked, 11);
        assert_eq!(stats.transports_checked, 0);
        assert_eq!(stats.tiles_visited, stats.total_checked());
        assert!(handle.is_done());
        assert!(handle.reached());
        assert_eq!(handle.path().len(), 11);
        assert_eq!(handle.stats(), Some(stats));
    }

    #[test]
    fn unreachable_target_exhausts_with_closest_path() {
        let pf = Pathfinder::new(corridor(), packed(3200, 3200, 0), [packed(3215, 3200, 0)]).unwrap();
        let handle = pf.handle();
        let stats = pf.run();
        assert_eq!(stats.outcome, SearchOutcome::Exhausted);
        let path = handle.path();
        assert_eq!(path.first(), Some(&packed(3200, 3200, 0)));
        assert_eq!(path.last(), Some(&packed(3210, 3200, 0)));
        assert!(!handle.reached());
    }

    #[test]
    fn cancelled_before_start_stops_immediately() {
        let pf = Pathfinder::new(corridor(), packed(3200, 3200, 0), [packed(3210, 3200, 0)]).unwrap();
        pf.cancel();
        let handle = pf.handle();
        let stats = pf.run();
        assert_eq!(stats.outcome, SearchOutcome::Cancelled);
        assert!(handle.is_done());
        assert!(handle.path().is_empty());
    }

    #[test]
    fn start_on_target_is_reached_at_once() {
        let start = packed(3205, 3200, 0);
        let pf = Pathfinder::new(corridor(), start, [start, start]).unwrap();
        assert_eq!(pf.targets(), &[start]);
        let handle = pf.handle();
        let stats = pf.run();
        assert_eq!(stats.outcome, SearchOutcome::Reached);
        assert_eq!(handle.path(), vec![start]);
    }
}
