//! Wilderness areas and the teleport restriction tiers derived from them.
//!
//! The wilderness is modelled as three nested rectangles above ground and three underground:
//! anywhere in the wilderness, level 20 and deeper, level 30 and deeper. Plane is ignored.

use serde::{Deserialize, Serialize};

use crate::point::PackedPoint;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Area {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Area {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub fn contains(&self, p: PackedPoint) -> bool {
        let (x, y) = (p.x(), p.y());
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

pub const ABOVE_GROUND: Area = Area::new(2944, 3523, 448, 448);
pub const ABOVE_GROUND_LEVEL_20: Area = Area::new(2944, 3680, 448, 448);
pub const ABOVE_GROUND_LEVEL_30: Area = Area::new(2944, 3760, 448, 448);
pub const UNDERGROUND: Area = Area::new(2944, 9918, 320, 442);
pub const UNDERGROUND_LEVEL_20: Area = Area::new(2944, 10075, 320, 442);
pub const UNDERGROUND_LEVEL_30: Area = Area::new(2944, 10155, 320, 442);

#[inline]
pub fn is_in_wilderness(p: PackedPoint) -> bool {
    ABOVE_GROUND.contains(p) || UNDERGROUND.contains(p)
}

#[inline]
pub fn is_in_level_20_wilderness(p: PackedPoint) -> bool {
    ABOVE_GROUND_LEVEL_20.contains(p) || UNDERGROUND_LEVEL_20.contains(p)
}

#[inline]
pub fn is_in_level_30_wilderness(p: PackedPoint) -> bool {
    ABOVE_GROUND_LEVEL_30.contains(p) || UNDERGROUND_LEVEL_30.contains(p)
}

/// Teleport restriction tier. Ordered from least to most restrictive; a teleport is usable
/// while `tier.level() <= max_wilderness_level`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WildernessTier {
    /// Outside the wilderness: every teleport can be used.
    Safe,
    /// Wilderness level 1-20: most teleports can be used.
    UpTo20,
    /// Wilderness level 21-30: only level-30 teleports can be used.
    UpTo30,
    /// Deeper than level 30: no teleports can be used.
    Deep,
}

impl WildernessTier {
    pub const fn level(self) -> i32 {
        match self {
            WildernessTier::Safe => 0,
            WildernessTier::UpTo20 => 20,
            WildernessTier::UpTo30 => 30,
            WildernessTier::Deep => 31,
        }
    }

    /// Tier of a single tile. The areas nest, so the first area the tile falls outside decides.
    pub fn of(p: PackedPoint) -> Self {
        if !is_in_wilderness(p) {
            WildernessTier::Safe
        } else if !is_in_level_20_wilderness(p) {
            WildernessTier::UpTo20
        } else if !is_in_level_30_wilderness(p) {
            WildernessTier::UpTo30
        } else {
            WildernessTier::Deep
        }
    }

    #[inline]
    pub fn permits(self, max_wilderness_level: i32) -> bool {
        self.level() <= max_wilderness_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::packed;

    #[test]
    fn tiers_follow_nested_areas() {
        assert_eq!(WildernessTier::of(packed(3222, 3218, 0)), WildernessTier::Safe);
        assert_eq!(WildernessTier::of(packed(3100, 3600, 0)), WildernessTier::UpTo20);
        assert_eq!(WildernessTier::of(packed(3100, 3700, 0)), WildernessTier::UpTo30);
        assert_eq!(WildernessTier::of(packed(3100, 3900, 0)), WildernessTier::Deep);
        // underground shares the same thresholds
        assert_eq!(WildernessTier::of(packed(3000, 10000, 0)), WildernessTier::UpTo20);
        assert_eq!(WildernessTier::of(packed(3000, 10160, 0)), WildernessTier::Deep);
    }

    #[test]
    fn area_bounds_are_half_open() {
        assert!(is_in_wilderness(packed(2944, 3523, 0)));
        assert!(!is_in_wilderness(packed(2943, 3523, 0)));
        assert!(!is_in_wilderness(packed(2944, 3522, 0)));
        assert!(!is_in_wilderness(packed(2944 + 448, 3600, 0)));
        assert!(is_in_wilderness(packed(2944, 3600, 3)));
    }

    #[test]
    fn tier_ordering_and_permission() {
        assert!(WildernessTier::Safe < WildernessTier::UpTo20);
        assert!(WildernessTier::UpTo30 < WildernessTier::Deep);
        assert!(WildernessTier::UpTo20.permits(20));
        assert!(!WildernessTier::UpTo30.permits(20));
        assert!(WildernessTier::UpTo30.permits(30));
        assert!(!WildernessTier::Deep.permits(30));
        assert!(WildernessTier::Safe.permits(0));
    }
}
