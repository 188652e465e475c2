//! Static collision map.
//!
//! Every tile carries an 8-bit direction mask (see [`crate::movement`]) plus a presence bit.
//! Tiles are stored per region of 64x64 tiles across all four planes; the region extent is the
//! addressable space of the map and sizes the visited set.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::config::PathfinderConfig;
use crate::db::Database;
use crate::error::LoadError;
use crate::movement::{mask_from_direction_list, mask_from_tiledata, movement_for, Movement, MOVEMENT_ORDER};
use crate::node::Candidate;
use crate::point::{PackedPoint, PLANES};
use crate::visited::VisitedTiles;

pub const REGION_SIZE: i32 = 64;
const REGION_SHIFT: i32 = 6;
const PLANE_TILES: usize = (REGION_SIZE * REGION_SIZE) as usize;
pub const TILES_PER_REGION: usize = PLANE_TILES * PLANES as usize;

const TILE_PRESENT: u16 = 1 << 8;
const DIRECTION_BITS: u16 = 0xFF;

/// Rectangle of regions covered by a map.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RegionExtent {
    pub min_region_x: i32,
    pub min_region_y: i32,
    pub width: i32,
    pub height: i32,
}

impl RegionExtent {
    pub fn region_count(&self) -> usize {
        (self.width.max(0) * self.height.max(0)) as usize
    }

    pub fn tile_count(&self) -> usize {
        self.region_count() * TILES_PER_REGION
    }

    /// (region slot, tile index inside the region) for an addressable tile.
    #[inline]
    pub fn locate(&self, p: PackedPoint) -> Option<(usize, usize)> {
        let rx = (p.x() >> REGION_SHIFT) - self.min_region_x;
        let ry = (p.y() >> REGION_SHIFT) - self.min_region_y;
        if rx < 0 || ry < 0 || rx >= self.width || ry >= self.height {
            return None;
        }
        let slot = (rx * self.height + ry) as usize;
        let local = p.plane() as usize * PLANE_TILES
            + ((p.y() & (REGION_SIZE - 1)) * REGION_SIZE + (p.x() & (REGION_SIZE - 1))) as usize;
        Some((slot, local))
    }

    fn covering(regions: impl Iterator<Item = (i32, i32)>) -> Self {
        let mut bounds: Option<(i32, i32, i32, i32)> = None;
        for (rx, ry) in regions {
            bounds = Some(match bounds {
                None => (rx, ry, rx, ry),
                Some((ax, ay, bx, by)) => (ax.min(rx), ay.min(ry), bx.max(rx), by.max(ry)),
            });
        }
        match bounds {
            Some((ax, ay, bx, by)) => RegionExtent { min_region_x: ax, min_region_y: ay, width: bx - ax + 1, height: by - ay + 1 },
            None => RegionExtent::default(),
        }
    }
}

pub struct CollisionMap {
    extent: RegionExtent,
    regions: Vec<Option<Box<[u16]>>>,
    tiles: usize,
}

impl CollisionMap {
    pub fn builder() -> CollisionMapBuilder {
        CollisionMapBuilder::default()
    }

    pub fn extent(&self) -> RegionExtent {
        self.extent
    }

    /// Number of tiles present in the map.
    pub fn tile_count(&self) -> usize {
        self.tiles
    }

    #[inline]
    fn flags(&self, p: PackedPoint) -> u16 {
        let Some((slot, local)) = self.extent.locate(p) else { return 0 };
        match &self.regions[slot] {
            Some(tiles) => tiles[local],
            None => 0,
        }
    }

    #[inline]
    pub fn contains(&self, p: PackedPoint) -> bool {
        self.flags(p) & TILE_PRESENT != 0
    }

    /// Allowed-direction mask of a tile; zero for missing tiles.
    #[inline]
    pub fn directions(&self, p: PackedPoint) -> u8 {
        (self.flags(p) & DIRECTION_BITS) as u8
    }

    /// A tile nothing can walk out of through its own mask (walls, scenery, missing tiles).
    #[inline]
    pub fn is_blocked(&self, p: PackedPoint) -> bool {
        self.directions(p) == 0
    }

    #[inline]
    fn allows(&self, p: PackedPoint, m: Movement) -> bool {
        self.directions(p) & m.bit != 0
    }

    fn is_blocked_at(&self, p: PackedPoint, dx: i32, dy: i32) -> bool {
        p.offset(dx, dy).map_or(true, |q| self.is_blocked(q))
    }

    /// Whether a single ordinary step from `from` to `to` is legal.
    pub fn can_step(&self, from: PackedPoint, to: PackedPoint) -> bool {
        if from.plane() != to.plane() {
            return false;
        }
        let Some(m) = movement_for(to.x() - from.x(), to.y() - from.y()) else { return false };
        if self.is_blocked(from) {
            self.can_leave_blocked(from, m)
        } else {
            self.allows(from, m) && self.contains(to)
        }
    }

    // A player standing on a blocked tile (e.g. after a transport) may step onto any open
    // neighbour; diagonals also need both orthogonal tiles open.
    fn can_leave_blocked(&self, from: PackedPoint, m: Movement) -> bool {
        if self.is_blocked_at(from, m.dx, m.dy) {
            return false;
        }
        m.is_cardinal() || (!self.is_blocked_at(from, m.dx, 0) && !self.is_blocked_at(from, 0, m.dy))
    }

    /// Enumerates ordinary moves and transport edges out of `at`, skipping visited tiles.
    pub fn neighbors<C>(&self, config: &C, at: PackedPoint, visited: &VisitedTiles, out: &mut Vec<Candidate>)
    where
        C: PathfinderConfig + ?Sized,
    {
        // Transports are already filtered by the config for the current game state.
        for edge in config.transports(at) {
            if visited.get(edge.destination) {
                continue;
            }
            out.push(Candidate::transport(edge.destination, edge.travel_time));
        }

        let blocked = self.is_blocked(at);
        for m in MOVEMENT_ORDER {
            let Some(next) = at.offset(m.dx, m.dy) else { continue };
            if visited.get(next) {
                continue;
            }
            if config.ignores_collision(next) {
                out.push(Candidate::walk(next));
                continue;
            }
            let traversable = if blocked {
                self.can_leave_blocked(at, m)
            } else {
                self.allows(at, m) && self.contains(next)
            };
            if traversable {
                out.push(Candidate::walk(next));
            } else if m.is_cardinal() && self.is_blocked(next) && !config.transports(next).is_empty() {
                // The transport starts on a blocked tile next to us, e.g. a fairy ring.
                out.push(Candidate::walk(next));
            }
        }
    }
}

impl std::fmt::Debug for CollisionMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollisionMap")
            .field("extent", &self.extent)
            .field("tiles", &self.tiles)
            .finish()
    }
}

/// Collects tiles and builds a [`CollisionMap`].
///
/// Tiles added with [`walkable`](Self::walkable) get a derived mask: a cardinal step is allowed
/// when the neighbour is walkable, a diagonal when the neighbour and both orthogonal tiles are.
/// Tiles added with [`with_mask`](Self::with_mask) keep their mask as given.
#[derive(Default)]
pub struct CollisionMapBuilder {
    explicit: FxHashMap<PackedPoint, u8>,
    walkable: FxHashSet<PackedPoint>,
}

impl CollisionMapBuilder {
    pub fn with_mask(mut self, p: PackedPoint, mask: u8) -> Self {
        self.insert_mask(p, mask);
        self
    }

    pub fn insert_mask(&mut self, p: PackedPoint, mask: u8) {
        self.walkable.remove(&p);
        self.explicit.insert(p, mask);
    }

    pub fn walkable(mut self, p: PackedPoint) -> Self {
        self.insert_walkable(p);
        self
    }

    pub fn insert_walkable(&mut self, p: PackedPoint) {
        self.explicit.remove(&p);
        self.walkable.insert(p);
    }

    /// Marks every tile of the rectangle walkable. Tiles outside the addressable range are skipped.
    pub fn walkable_rect(mut self, x: i32, y: i32, width: i32, height: i32, plane: i32) -> Self {
        for tx in x..x + width {
            for ty in y..y + height {
                if let Some(p) = PackedPoint::new(tx, ty, plane) {
                    self.insert_walkable(p);
                }
            }
        }
        self
    }

    /// Removes a tile, leaving a hole that nothing can enter.
    pub fn remove(mut self, p: PackedPoint) -> Self {
        self.walkable.remove(&p);
        self.explicit.remove(&p);
        self
    }

    pub fn build(self) -> CollisionMap {
        let regions = self
            .explicit
            .keys()
            .chain(self.walkable.iter())
            .map(|p| (p.x() >> REGION_SHIFT, p.y() >> REGION_SHIFT));
        let extent = RegionExtent::covering(regions);
        let mut map = CollisionMap { extent, regions: Vec::new(), tiles: 0 };
        map.regions.resize_with(extent.region_count(), || None);

        for (&p, &mask) in &self.explicit {
            map.put(p, mask);
        }
        for &p in &self.walkable {
            let mut mask = 0u8;
            for m in MOVEMENT_ORDER {
                let open = |dx: i32, dy: i32| p.offset(dx, dy).map_or(false, |q| self.walkable.contains(&q));
                let ok = open(m.dx, m.dy) && (m.is_cardinal() || (open(m.dx, 0) && open(0, m.dy)));
                if ok {
                    mask |= m.bit;
                }
            }
            map.put(p, mask);
        }
        map
    }
}

impl CollisionMap {
    fn put(&mut self, p: PackedPoint, mask: u8) {
        let Some((slot, local)) = self.extent.locate(p) else { return };
        let tiles = self.regions[slot].get_or_insert_with(|| vec![0u16; TILES_PER_REGION].into_boxed_slice());
        if tiles[local] & TILE_PRESENT == 0 {
            self.tiles += 1;
        }
        tiles[local] = TILE_PRESENT | mask as u16;
    }

    /// Loads every row of the `tiles` table. `allowed_directions` wins over `tiledata` when both
    /// are present; `blocked_directions` is removed from the result.
    pub fn from_database(db: &Database) -> Result<Self, LoadError> {
        let mut builder = CollisionMap::builder();
        let mut rows = 0usize;
        for plane in 0..PLANES {
            for row in db.iter_tiles_by_plane(plane)? {
                let p = PackedPoint::new(row.x, row.y, row.plane)
                    .ok_or(LoadError::InvalidTile { x: row.x, y: row.y, plane: row.plane })?;
                let allowed = match (&row.allowed_directions, row.tiledata) {
                    (Some(list), _) if !list.trim().is_empty() => mask_from_direction_list(list),
                    (_, Some(tiledata)) => mask_from_tiledata(tiledata),
                    _ => 0,
                };
                let blocked = row.blocked_directions.as_deref().map_or(0, mask_from_direction_list);
                builder.insert_mask(p, allowed & !blocked);
                rows += 1;
            }
        }
        let map = builder.build();
        debug!(rows, regions = map.extent().region_count(), "loaded collision map");
        Ok(map)
    }
}
