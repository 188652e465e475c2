pub const TILES_BY_PLANE: &str = "SELECT x, y, plane, tiledata, allowed_directions, blocked_directions FROM tiles WHERE plane = ?1 ORDER BY y ASC, x ASC";
pub const TILE_BY_COORD: &str = "SELECT x, y, plane, tiledata, allowed_directions, blocked_directions FROM tiles WHERE x = ?1 AND y = ?2 AND plane = ?3";

pub const ALL_TRANSPORTS: &str = "SELECT id, kind, \
    origin_x, origin_y, origin_plane, \
    dest_x, dest_y, dest_plane, \
    duration, max_wilderness_level, members, display_info \
    FROM transports ORDER BY id ASC";

pub const ALL_TRANSPORT_REQUIREMENTS: &str = "SELECT transport_id, key, comparison, value \
    FROM transport_requirements ORDER BY transport_id ASC, rowid ASC";

pub const ALL_TRANSPORT_ITEMS: &str = "SELECT transport_id, group_index, item_id, role, quantity \
    FROM transport_items ORDER BY transport_id ASC, group_index ASC, rowid ASC";
