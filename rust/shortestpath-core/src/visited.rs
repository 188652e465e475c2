//! One bit per addressable tile, marking tiles already scheduled for expansion.
//!
//! Region bitsets are allocated on first write. Tiles outside the map extent read as visited,
//! so they are never scheduled.

use bitvec::prelude::*;

use crate::map::{RegionExtent, TILES_PER_REGION};
use crate::point::PackedPoint;

pub struct VisitedTiles {
    extent: RegionExtent,
    regions: Vec<Option<BitVec<u64, Lsb0>>>,
    count: usize,
}

impl VisitedTiles {
    pub fn new(extent: RegionExtent) -> Self {
        let mut regions = Vec::new();
        regions.resize_with(extent.region_count(), || None);
        Self { extent, regions, count: 0 }
    }

    #[inline]
    pub fn get(&self, p: PackedPoint) -> bool {
        let Some((slot, bit)) = self.extent.locate(p) else { return true };
        match &self.regions[slot] {
            Some(bits) => bits[bit],
            None => false,
        }
    }

    /// Marks `p`. Returns true only when the bit was newly set; tiles outside the extent
    /// are never marked.
    #[inline]
    pub fn set(&mut self, p: PackedPoint) -> bool {
        let Some((slot, bit)) = self.extent.locate(p) else { return false };
        let bits = self.regions[slot].get_or_insert_with(|| BitVec::repeat(false, TILES_PER_REGION));
        if bits[bit] {
            return false;
        }
        bits.set(bit, true);
        self.count += 1;
        true
    }

    /// Number of tiles marked since the last clear.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn clear(&mut self) {
        self.regions.iter_mut().for_each(|r| *r = None);
        self.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::packed;

    fn extent() -> RegionExtent {
        // regions (50..52, 50..52) => tiles 3200..3328
        RegionExtent { min_region_x: 50, min_region_y: 50, width: 2, height: 2 }
    }

    #[test]
    fn set_once_then_reports_visited() {
        let mut v = VisitedTiles::new(extent());
        let p = packed(3210, 3250, 1);
        assert!(!v.get(p));
        assert!(v.set(p));
        assert!(v.get(p));
        assert!(!v.set(p));
        assert_eq!(v.len(), 1);
        // same x/y on another plane is a different tile
        assert!(!v.get(packed(3210, 3250, 0)));
    }

    #[test]
    fn outside_extent_reads_visited_and_is_never_set() {
        let mut v = VisitedTiles::new(extent());
        let outside = packed(3100, 3250, 0);
        assert!(v.get(outside));
        assert!(!v.set(outside));
        assert!(v.is_empty());
    }

    #[test]
    fn clear_resets_everything() {
        let mut v = VisitedTiles::new(extent());
        for x in 3200..3328 {
            v.set(packed(x, 3300, 0));
        }
        assert_eq!(v.len(), 128);
        v.clear();
        assert!(v.is_empty());
        assert!(!v.get(packed(3250, 3300, 0)));
    }
}
