//! Packed tile coordinates.
//!
//! A tile is packed into a single `u32`: 15 bits of x, 15 bits of y and 2 bits of plane.
//! The packed value is the node identity used by the map, the visited set and the search.

use serde::{Deserialize, Serialize};
use std::fmt;

const COORD_BITS: u32 = 15;
const COORD_MASK: u32 = (1 << COORD_BITS) - 1;
const PLANE_MASK: u32 = 0b11;

/// Largest x or y that fits in a packed coordinate.
pub const MAX_COORD: i32 = COORD_MASK as i32;
/// Number of vertical levels a packed coordinate can address.
pub const PLANES: i32 = 4;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldPoint {
    pub x: i32,
    pub y: i32,
    pub plane: i32,
}

impl WorldPoint {
    pub const fn new(x: i32, y: i32, plane: i32) -> Self {
        Self { x, y, plane }
    }

    /// Packs the point, or `None` when a component falls outside the addressable range.
    pub fn pack(self) -> Option<PackedPoint> {
        PackedPoint::new(self.x, self.y, self.plane)
    }
}

impl From<PackedPoint> for WorldPoint {
    fn from(p: PackedPoint) -> Self {
        WorldPoint { x: p.x(), y: p.y(), plane: p.plane() }
    }
}

impl fmt::Display for WorldPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.plane)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackedPoint(u32);

impl PackedPoint {
    #[inline]
    pub fn new(x: i32, y: i32, plane: i32) -> Option<Self> {
        if !(0..=MAX_COORD).contains(&x) || !(0..=MAX_COORD).contains(&y) || !(0..PLANES).contains(&plane) {
            return None;
        }
        Some(Self::pack_unchecked(x as u32, y as u32, plane as u32))
    }

    #[inline]
    const fn pack_unchecked(x: u32, y: u32, plane: u32) -> Self {
        PackedPoint((x & COORD_MASK) | ((y & COORD_MASK) << COORD_BITS) | ((plane & PLANE_MASK) << (2 * COORD_BITS)))
    }

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        PackedPoint(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn x(self) -> i32 {
        (self.0 & COORD_MASK) as i32
    }

    #[inline]
    pub const fn y(self) -> i32 {
        ((self.0 >> COORD_BITS) & COORD_MASK) as i32
    }

    #[inline]
    pub const fn plane(self) -> i32 {
        ((self.0 >> (2 * COORD_BITS)) & PLANE_MASK) as i32
    }

    /// The tile `dx, dy` away on the same plane, if it is addressable.
    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        Self::new(self.x() + dx, self.y() + dy, self.plane())
    }

    /// Chebyshev distance: a diagonal step counts as one. Plane difference counts like an axis.
    #[inline]
    pub fn distance(self, other: Self) -> i32 {
        let (dx, dy, dz) = self.deltas(other);
        dx.max(dy).max(dz)
    }

    /// Diagonal distance where a diagonal step counts as two (Manhattan).
    #[inline]
    pub fn diagonal_distance(self, other: Self) -> i32 {
        let (dx, dy, dz) = self.deltas(other);
        dx + dy + dz
    }

    #[inline]
    fn deltas(self, other: Self) -> (i32, i32, i32) {
        (
            (self.x() - other.x()).abs(),
            (self.y() - other.y()).abs(),
            (self.plane() - other.plane()).abs(),
        )
    }
}

impl fmt::Debug for PackedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PackedPoint({}, {}, {})", self.x(), self.y(), self.plane())
    }
}

impl fmt::Display for PackedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        WorldPoint::from(*self).fmt(f)
    }
}

#[cfg(test)]
pub(crate) fn packed(x: i32, y: i32, plane: i32) -> PackedPoint {
    PackedPoint::new(x, y, plane).unwrap_or_else(|| panic!("tile ({x}, {y}, {plane}) is not addressable"))
}
