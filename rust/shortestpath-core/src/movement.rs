//! Movement direction bits and the tiledata decoding used by the collision loader.

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Movement {
    pub name: &'static str,
    pub bit: u8,
    pub dx: i32,
    pub dy: i32,
}

impl Movement {
    #[inline]
    pub const fn is_cardinal(&self) -> bool {
        self.dx == 0 || self.dy == 0
    }
}

// Bit index equals the position in MOVEMENT_ORDER.
pub const WEST: Movement = Movement { name: "west", bit: 1 << 0, dx: -1, dy: 0 };
pub const EAST: Movement = Movement { name: "east", bit: 1 << 1, dx: 1, dy: 0 };
pub const SOUTH: Movement = Movement { name: "south", bit: 1 << 2, dx: 0, dy: -1 };
pub const NORTH: Movement = Movement { name: "north", bit: 1 << 3, dx: 0, dy: 1 };
pub const SOUTHWEST: Movement = Movement { name: "southwest", bit: 1 << 4, dx: -1, dy: -1 };
pub const SOUTHEAST: Movement = Movement { name: "southeast", bit: 1 << 5, dx: 1, dy: -1 };
pub const NORTHWEST: Movement = Movement { name: "northwest", bit: 1 << 6, dx: -1, dy: 1 };
pub const NORTHEAST: Movement = Movement { name: "northeast", bit: 1 << 7, dx: 1, dy: 1 };

/// Expansion order: cardinals first, then diagonals. Changing it changes which of several
/// equal-length paths a search returns.
pub const MOVEMENT_ORDER: [Movement; 8] = [
    WEST, EAST, SOUTH, NORTH, SOUTHWEST, SOUTHEAST, NORTHWEST, NORTHEAST,
];

pub const ALL_DIRECTIONS: u8 = 0xFF;

/// Returns the movement for a unit step, if `(dx, dy)` is one.
pub fn movement_for(dx: i32, dy: i32) -> Option<Movement> {
    MOVEMENT_ORDER.iter().copied().find(|m| m.dx == dx && m.dy == dy)
}

// External tiledata layout:
// bit0=west, bit1=north, bit2=east, bit3=south,
// bit4=northwest, bit5=northeast, bit6=southeast, bit7=southwest
const TILEDATA_ORDER: [Movement; 8] = [
    WEST, NORTH, EAST, SOUTH, NORTHWEST, NORTHEAST, SOUTHEAST, SOUTHWEST,
];

static TILEDATA_TO_MASK: [u8; 256] = build_tiledata_lookup();

const fn build_tiledata_lookup() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut v = 0usize;
    while v < 256 {
        let mut m = 0u8;
        let mut b = 0usize;
        while b < 8 {
            if v & (1 << b) != 0 {
                m |= TILEDATA_ORDER[b].bit;
            }
            b += 1;
        }
        table[v] = m;
        v += 1;
    }
    table
}

/// Maps the low byte of a tiledata value to the internal direction mask.
#[inline]
pub fn mask_from_tiledata(value: i64) -> u8 {
    TILEDATA_TO_MASK[(value & 0xFF) as usize]
}

/// Parses `allowed_directions`: either a decimal internal mask or comma separated direction names.
/// Unknown names are ignored.
pub fn mask_from_direction_list(raw: &str) -> u8 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0;
    }
    if let Ok(n) = trimmed.parse::<u8>() {
        return n;
    }
    trimmed
        .split(',')
        .map(|part| part.trim().to_ascii_lowercase())
        .filter_map(|name| MOVEMENT_ORDER.iter().find(|m| m.name == name))
        .fold(0u8, |mask, m| mask | m.bit)
}
