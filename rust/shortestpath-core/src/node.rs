use std::cmp::Ordering;
use std::sync::Arc;

use crate::point::PackedPoint;

/// How a node was reached from its parent.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EdgeKind {
    /// An ordinary step to an adjacent tile.
    Walk,
    /// A transport edge with its own travel time.
    Transport { travel_time: u32 },
}

/// A tile offered for expansion by the map or the edge provider.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub point: PackedPoint,
    pub kind: EdgeKind,
}

impl Candidate {
    #[inline]
    pub fn walk(point: PackedPoint) -> Self {
        Self { point, kind: EdgeKind::Walk }
    }

    #[inline]
    pub fn transport(point: PackedPoint, travel_time: u32) -> Self {
        Self { point, kind: EdgeKind::Transport { travel_time } }
    }
}

/// Immutable search node. Parent chains are shared through `Arc`, so a chain can be walked from
/// any thread while the search keeps extending it.
#[derive(Debug)]
pub struct Node {
    point: PackedPoint,
    parent: Option<Arc<Node>>,
    cost: u32,
    kind: EdgeKind,
}

impl Node {
    pub fn root(point: PackedPoint) -> Arc<Node> {
        Arc::new(Node { point, parent: None, cost: 0, kind: EdgeKind::Walk })
    }

    /// Builds the node reached from `parent` through `candidate`.
    /// Walking costs the tile distance covered (one per step); a transport costs its travel time.
    pub fn child(parent: &Arc<Node>, candidate: Candidate) -> Arc<Node> {
        let step = match candidate.kind {
            EdgeKind::Walk => parent.point.distance(candidate.point) as u32,
            EdgeKind::Transport { travel_time } => travel_time,
        };
        Arc::new(Node {
            point: candidate.point,
            parent: Some(Arc::clone(parent)),
            cost: parent.cost.saturating_add(step),
            kind: candidate.kind,
        })
    }

    #[inline]
    pub fn point(&self) -> PackedPoint {
        self.point
    }

    #[inline]
    pub fn cost(&self) -> u32 {
        self.cost
    }

    #[inline]
    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    pub fn parent(&self) -> Option<&Arc<Node>> {
        self.parent.as_ref()
    }

    #[inline]
    pub fn is_transport(&self) -> bool {
        matches!(self.kind, EdgeKind::Transport { .. })
    }

    /// Tiles from the root to this node.
    pub fn path(&self) -> Vec<PackedPoint> {
        let mut tiles = vec![self.point];
        let mut cur = self.parent.as_deref();
        while let Some(n) = cur {
            tiles.push(n.point);
            cur = n.parent.as_deref();
        }
        tiles.reverse();
        tiles
    }
}

impl Drop for Node {
    // Unlink the chain iteratively; the default recursive drop overflows the stack on long paths.
    fn drop(&mut self) {
        let mut next = self.parent.take();
        while let Some(parent) = next {
            next = match Arc::into_inner(parent) {
                Some(mut n) => n.parent.take(),
                None => None,
            };
        }
    }
}

/// Entry of the pending (transport) queue: min-ordered by cost, then by insertion sequence.
#[derive(Debug)]
pub(crate) struct PendingNode {
    pub node: Arc<Node>,
    pub seq: u64,
}

impl PartialEq for PendingNode {
    fn eq(&self, other: &Self) -> bool {
        self.node.cost == other.node.cost && self.seq == other.seq
    }
}

impl Eq for PendingNode {}

impl PartialOrd for PendingNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PendingNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; invert for min-heap behaviour
        (other.node.cost, other.seq).cmp(&(self.node.cost, self.seq))
    }
}
