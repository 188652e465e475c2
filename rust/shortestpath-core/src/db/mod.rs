use crate::db::queries::*;
use crate::db::rows::*;
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

pub mod open;
pub mod queries;
pub mod rows;

/// Read access to a world database (`tiles`, `transports`, `transport_requirements`,
/// `transport_items`).
pub struct Database {
    conn: Connection,
}

fn is_no_such_table(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(_, Some(msg)) => msg.contains("no such table"),
        _ => false,
    }
}

impl Database {
    /// Open a SQLite database in read-only mode with PRAGMAs from `SHORTESTPATH_SQLITE_*`.
    pub fn open_read_only<P: AsRef<Path>>(path: P) -> rusqlite::Result<Self> {
        let cfg = crate::db::open::DbOpenConfig::from_env();
        let conn = crate::db::open::open_read_only_with_config(path, &cfg)?;
        Ok(Self { conn })
    }

    /// Construct from an existing connection (useful for tests).
    pub fn from_connection(conn: Connection) -> Self { Self { conn } }

    pub fn fetch_tile(&self, x: i32, y: i32, plane: i32) -> rusqlite::Result<Option<TileRow>> {
        let mut stmt = self.conn.prepare_cached(TILE_BY_COORD)?;
        stmt.query_row(params![x, y, plane], map_tile_row).optional()
    }

    pub fn iter_tiles_by_plane(&self, plane: i32) -> rusqlite::Result<Vec<TileRow>> {
        let mut stmt = self.conn.prepare_cached(TILES_BY_PLANE)?;
        let mut rows = stmt.query(params![plane])?;
        let mut out = Vec::new();
        while let Some(r) = rows.next()? {
            out.push(map_tile_row(r)?);
        }
        Ok(out)
    }

    pub fn iter_transports(&self) -> rusqlite::Result<Vec<TransportRow>> {
        self.collect_optional(ALL_TRANSPORTS, map_transport_row)
    }

    pub fn iter_transport_requirements(&self) -> rusqlite::Result<Vec<TransportRequirementRow>> {
        self.collect_optional(ALL_TRANSPORT_REQUIREMENTS, map_requirement_row)
    }

    pub fn iter_transport_items(&self) -> rusqlite::Result<Vec<TransportItemRow>> {
        self.collect_optional(ALL_TRANSPORT_ITEMS, map_item_row)
    }

    // A missing table reads as empty.
    fn collect_optional<T>(&self, sql: &str, map: fn(&Row) -> rusqlite::Result<T>) -> rusqlite::Result<Vec<T>> {
        let mut stmt = match self.conn.prepare_cached(sql) {
            Ok(s) => s,
            Err(e) if is_no_such_table(&e) => return Ok(vec![]),
            Err(e) => return Err(e),
        };
        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(r) = rows.next()? {
            out.push(map(r)?);
        }
        Ok(out)
    }

    #[cfg(test)]
    pub fn conn(&self) -> &Connection { &self.conn }
}

fn map_tile_row(r: &Row) -> rusqlite::Result<TileRow> {
    Ok(TileRow {
        x: r.get("x")?,
        y: r.get("y")?,
        plane: r.get("plane")?,
        tiledata: r.get("tiledata")?,
        allowed_directions: text_column(r, "allowed_directions")?,
        blocked_directions: text_column(r, "blocked_directions")?,
    })
}

fn map_transport_row(r: &Row) -> rusqlite::Result<TransportRow> {
    Ok(TransportRow {
        id: r.get("id")?,
        kind: r.get("kind")?,
        origin_x: r.get("origin_x")?,
        origin_y: r.get("origin_y")?,
        origin_plane: r.get("origin_plane")?,
        dest_x: r.get("dest_x")?,
        dest_y: r.get("dest_y")?,
        dest_plane: r.get("dest_plane")?,
        duration: r.get("duration")?,
        max_wilderness_level: r.get("max_wilderness_level")?,
        members: r.get("members")?,
        display_info: r.get("display_info")?,
    })
}

fn map_requirement_row(r: &Row) -> rusqlite::Result<TransportRequirementRow> {
    Ok(TransportRequirementRow {
        transport_id: r.get("transport_id")?,
        key: r.get("key")?,
        comparison: r.get("comparison")?,
        value: text_column(r, "value")?.unwrap_or_default(),
    })
}

fn map_item_row(r: &Row) -> rusqlite::Result<TransportItemRow> {
    Ok(TransportItemRow {
        transport_id: r.get("transport_id")?,
        group_index: r.get::<_, Option<i64>>("group_index")?.unwrap_or(0),
        item_id: r.get("item_id")?,
        role: r.get("role")?,
        quantity: r.get("quantity")?,
    })
}

// Columns that hold either text or numbers depending on how the data was imported.
fn text_column(r: &Row, name: &str) -> rusqlite::Result<Option<String>> {
    Ok(match r.get_ref(name)? {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(t) | ValueRef::Blob(t) => Some(String::from_utf8_lossy(t).into_owned()),
    })
}
